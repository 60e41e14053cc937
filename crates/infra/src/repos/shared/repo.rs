#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpdateResult {
    pub updated_count: i64,
}

impl UpdateResult {
    pub fn found(&self) -> bool {
        self.updated_count > 0
    }
}
