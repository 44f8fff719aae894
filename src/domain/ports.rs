use crate::utils::error::Result;

/// 船隻資料檔的讀寫介面
pub trait Storage {
    /// Reads the whole backing file. Returns `Ok(None)` when it does not exist yet.
    fn read_file(&self) -> Result<Option<Vec<u8>>>;

    /// Replaces the backing file contents.
    fn write_file(&self, data: &[u8]) -> Result<()>;

    fn describe(&self) -> String;
}

pub trait ConfigProvider {
    fn data_file(&self) -> &std::path::Path;
    fn max_boats(&self) -> usize;
}
