pub mod autocomplete;
pub mod editor;
pub mod find_bar;
pub mod layout;
pub mod status_bar;

use crate::app::App;
use ratatui::Frame;

pub fn render(frame: &mut Frame, app: &mut App) {
    layout::render(frame, app);
}
