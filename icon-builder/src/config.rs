/// The image the icon is built from
pub const SOURCE_PATH: &str = "assets/icon.png";

/// Where the finished icon container is written
pub const DESTINATION_PATH: &str = "assets/icon.ico";

/// The square edge lengths of the generated variants, smallest first
pub const ICON_SIZES: [u32; 9] = [16, 24, 32, 48, 64, 96, 128, 256, 512];
