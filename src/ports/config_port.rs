//! Configuration access port trait.
//!
//! Keys are dotted paths into a nested document (`stocks`, `output.dir`).

pub trait ConfigPort {
    fn contains(&self, key: &str) -> bool;
    fn get_string(&self, key: &str) -> Option<String>;
    /// `None` when the key is absent or not a list of scalars.
    fn get_list(&self, key: &str) -> Option<Vec<String>>;
    /// `Ok(None)` when absent, `Err` with a reason when present but not an
    /// integer.
    fn get_int(&self, key: &str) -> Result<Option<i64>, String>;
    /// Accepts `true`/`false`, `yes`/`no` and `1`/`0`.
    fn get_bool(&self, key: &str) -> Result<Option<bool>, String>;
}
