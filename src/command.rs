use crate::view::ViewTab;

#[derive(Debug, Clone)]
pub enum Command {
    ViewChanged { from: ViewTab, to: ViewTab },
    Exit,
}
