pub trait ObjectStore {
    fn upload_object(&self, bucket: &str, key: &str, body: &[u8]) -> Result<(), String>;
}
