use padlink::PadCommand;

#[derive(Debug, Clone)]
pub enum AppEvent {
    Command(PadCommand),
    ConfigReload,
}
