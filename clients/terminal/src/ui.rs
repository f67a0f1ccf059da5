use crate::app::App;
use echo_core::RandomSource;
use ratatui::{buffer::Buffer, layout::Rect, widgets::Widget};

impl<R: RandomSource> Widget for &App<R> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // Scene coordinates are terminal cells; anything outside the area is clipped
        for cell in self.session.scene().cells() {
            let (Ok(x), Ok(y)) = (u16::try_from(cell.position.x), u16::try_from(cell.position.y))
            else {
                continue;
            };
            if x >= area.width || y >= area.height {
                continue;
            }
            if let Some(target) = buf.cell_mut((area.x + x, area.y + y)) {
                target.set_char(cell.character);
            }
        }
    }
}
