//! Module trait for the views behind each tab

use crossterm::event::KeyEvent;
use ratatui::layout::Rect;
use ratatui::Frame;

use super::{Action, Context};
use crate::domain::ModuleId;

/// A tab's view: handles its own keys and renders into the content area
pub trait Module {
    fn id(&self) -> ModuleId;

    /// Called each time navigation lands on this module
    fn on_mount(&mut self, _ctx: &mut Context) -> Action {
        Action::None
    }

    /// Handle keyboard input
    /// Returns an Action describing what should happen
    fn handle_key(&mut self, key: KeyEvent, ctx: &mut Context) -> Action;

    fn render(&self, frame: &mut Frame, area: Rect, ctx: &Context);
}
