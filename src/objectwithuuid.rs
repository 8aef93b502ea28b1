use uuid::Uuid;

/// Objects that carry a stable identity for log correlation.
pub trait ObjectWithUUID {
    fn uuid(&self) -> &Uuid;

    fn short_id(&self) -> String {
        let mut id = self.uuid().simple().to_string();
        id.truncate(8);
        id
    }
}
