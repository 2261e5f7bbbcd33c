mod staged;

pub use self::staged::StagedImage;
pub(crate) use self::staged::StagedRow;
