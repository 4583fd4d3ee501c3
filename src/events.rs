#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEvent {
    ConfigReload,
}
