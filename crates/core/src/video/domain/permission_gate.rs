#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PermissionStatus {
    Granted,
    Denied(String),
}

/// Confirms camera access before any frame is delivered.
pub trait PermissionGate {
    fn request(&self) -> PermissionStatus;
}
