use icon_builder::build_icon;
use image::{DynamicImage, Rgba, RgbaImage};
use std::io::Write;
use std::sync::{Arc, Mutex};

/// Collects everything the fmt layer writes
#[derive(Clone, Default)]
struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    fn lines(&self) -> Vec<String> {
        let bytes = self.0.lock().unwrap();
        String::from_utf8_lossy(&bytes).lines().map(str::to_owned).collect()
    }
}

impl Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

/// Runs `f` with a subscriber writing into the returned capture.
fn capture<R>(f: impl FnOnce() -> R) -> (R, CapturedLogs) {
    let logs = CapturedLogs::default();
    let writer = logs.clone();

    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .without_time()
        .with_max_level(tracing::Level::INFO)
        .finish();

    let result = tracing::subscriber::with_default(subscriber, f);
    (result, logs)
}

fn count_level(lines: &[String], level: &str) -> usize {
    lines
        .iter()
        .filter(|line| line.split_whitespace().next() == Some(level))
        .count()
}

#[test]
fn success_reports_destination_original_size_and_variants() {
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("icon.png");
    let destination = dir.path().join("icon.ico");
    DynamicImage::ImageRgba8(RgbaImage::from_fn(1024, 1024, |x, y| {
        Rgba([(x / 4) as u8, (y / 4) as u8, 64, 255])
    }))
    .save(&source)
    .unwrap();

    let (outcome, logs) = capture(|| build_icon(&source, &destination));
    assert!(outcome.is_success());

    let lines = logs.lines();
    let written = format!("Icon written to {}", destination.display());
    assert!(lines.iter().any(|l| l.ends_with(&written)), "{:?}", lines);
    assert!(lines.iter().any(|l| l.ends_with("Original image size: 1024x1024")), "{:?}", lines);
    assert!(
        lines.iter().any(|l| l.ends_with(
            "Generated sizes: [16x16, 24x24, 32x32, 48x48, 64x64, 96x96, 128x128, 256x256, 512x512]"
        )),
        "{:?}",
        lines
    );
    assert_eq!(count_level(&lines, "WARN"), 0);
    assert_eq!(count_level(&lines, "ERROR"), 0);
}

#[test]
fn total_failure_reports_both_attempts() {
    let dir = tempfile::tempdir().unwrap();

    let (outcome, logs) = capture(|| {
        build_icon(dir.path().join("missing.png"), dir.path().join("icon.ico"))
    });
    assert!(!outcome.is_success());

    let lines = logs.lines();
    assert_eq!(count_level(&lines, "WARN"), 1, "{:?}", lines);
    assert_eq!(count_level(&lines, "ERROR"), 1, "{:?}", lines);
    assert!(lines.iter().all(|l| !l.contains("Icon written to")));
}
