//! Desktop user interface with egui/eframe

mod app;
pub mod components;
mod state;
mod theme;

pub use app::AssistantApp;
pub use state::UiState;
pub use theme::Theme;

use crate::integration::ClientConfig;
use crate::speech::HostCapabilities;

/// Run the assistant window until it is closed
pub fn run(config: ClientConfig, host: HostCapabilities) -> eframe::Result<()> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([900.0, 720.0])
            .with_min_inner_size([520.0, 420.0])
            .with_title("Retail Analytics Assistant"),
        ..Default::default()
    };

    eframe::run_native(
        "Retail Analytics Assistant",
        options,
        Box::new(|cc| Ok(Box::new(AssistantApp::new(cc, config, host)?))),
    )
}
