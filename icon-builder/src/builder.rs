use crate::config::ICON_SIZES;
use crate::container::{ContainerEntry, IconContainer};
use crate::error::IconBuildError;
use crate::variant::{Normalization, PixelLayout, PreparedSource};
use image::ImageReader;
use std::fmt;
use std::path::{Path, PathBuf};

/// Width and height of an image, displayed as `WxH`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub fn square(size: u32) -> Self {
        Self {
            width: size,
            height: size,
        }
    }
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// What a successful attempt produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildReport {
    destination: PathBuf,
    original: Dimensions,
    variants: Vec<Dimensions>,
    layout: PixelLayout,
}

impl BuildReport {
    pub fn destination(&self) -> &Path {
        &self.destination
    }

    /// The size of the decoded source image
    pub fn original(&self) -> Dimensions {
        self.original
    }

    /// The sizes of the stored variants, in container order
    pub fn variants(&self) -> &[Dimensions] {
        &self.variants
    }

    /// The layout shared by all stored variants
    pub fn layout(&self) -> PixelLayout {
        self.layout
    }

    fn variant_list(&self) -> String {
        let sizes: Vec<String> = self.variants.iter().map(|d| d.to_string()).collect();
        format!("[{}]", sizes.join(", "))
    }

    fn log(&self) {
        tracing::info!("Icon written to {}", self.destination.display());
        tracing::info!("Original image size: {}", self.original);
        tracing::info!("Generated sizes: {}", self.variant_list());
    }
}

/// How a call to [`build_icon`] ended
#[derive(Debug)]
#[must_use]
pub enum BuildOutcome {
    /// The first attempt succeeded
    Primary(BuildReport),

    /// The first attempt failed, the opaque retry succeeded
    Fallback {
        primary_error: IconBuildError,
        report: BuildReport,
    },

    /// Both attempts failed, the destination was left untouched
    Failed {
        primary_error: IconBuildError,
        fallback_error: IconBuildError,
    },
}

impl BuildOutcome {
    pub fn report(&self) -> Option<&BuildReport> {
        match self {
            Self::Primary(report) | Self::Fallback { report, .. } => Some(report),
            Self::Failed { .. } => None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.report().is_some()
    }
}

/// Builds the icon container at `destination` from the image at `source`.
///
/// Any failure of the first attempt causes exactly one retry with the source
/// forced to opaque RGB. Every branch is reported through `tracing`.
pub fn build_icon(source: impl AsRef<Path>, destination: impl AsRef<Path>) -> BuildOutcome {
    build_with_fallback(source.as_ref(), destination.as_ref(), attempt)
}

fn build_with_fallback<F>(source: &Path, destination: &Path, mut attempt: F) -> BuildOutcome
where
    F: FnMut(&Path, &Path, Normalization) -> Result<BuildReport, IconBuildError>,
{
    tracing::debug!("Building icon from {}...", source.display());
    let primary_error = match attempt(source, destination, Normalization::Preserve) {
        Ok(report) => {
            report.log();
            return BuildOutcome::Primary(report);
        }
        Err(err) => err,
    };

    tracing::warn!("Failed to build icon: {}", primary_error);
    tracing::info!("Retrying with the source converted to opaque RGB...");

    match attempt(source, destination, Normalization::ForceOpaque) {
        Ok(report) => {
            report.log();
            BuildOutcome::Fallback {
                primary_error,
                report,
            }
        }
        Err(fallback_error) => {
            tracing::error!("Failed to build icon from opaque copy: {}", fallback_error);
            BuildOutcome::Failed {
                primary_error,
                fallback_error,
            }
        }
    }
}

/// Runs the whole procedure once: decode, resize to every size, encode, persist.
pub fn attempt(
    source: &Path,
    destination: &Path,
    normalization: Normalization,
) -> Result<BuildReport, IconBuildError> {
    let image = ImageReader::open(source)?.with_guessed_format()?.decode()?;
    let original = Dimensions {
        width: image.width(),
        height: image.height(),
    };
    tracing::debug!("Decoded {} source with color mode {:?}", original, image.color());

    let prepared = PreparedSource::new(&image, normalization)?;
    let variants = prepared.render_all(&ICON_SIZES)?;

    let mut container = IconContainer::new();
    for variant in &variants {
        container.add_entry(ContainerEntry::encode(variant)?);
    }

    persist(destination, &container)?;

    Ok(BuildReport {
        destination: destination.to_path_buf(),
        original,
        variants: container
            .dimensions()
            .into_iter()
            .map(|(width, height)| Dimensions { width, height })
            .collect(),
        layout: prepared.layout(),
    })
}

/// Replaces `destination` with the container in one step, through a temporary
/// file in the same directory.
fn persist(destination: &Path, container: &IconContainer) -> Result<(), IconBuildError> {
    let dir = match destination.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir)?;

    let mut file = tempfile::NamedTempFile::new_in(dir)?;
    container.write(&mut file)?;
    file.as_file().sync_all()?;
    file.persist(destination).map_err(|err| err.error)?;

    Ok(())
}
