//! Interactive display of the exported chart.
//!
//! The chart is rendered into a bitmap and shown in a native window. [`show`] blocks until the
//! window is closed. Without the `viewer` feature the step is skipped with a warning.
use crate::{error::PsResult, plottable::Chart};

/// Rendering scale of the on-screen chart.
pub const VIEWER_SCALE: f64 = 1.0;

#[cfg(feature = "viewer")]
mod window {
    use eframe::egui;
    use image::RgbImage;

    use crate::error::{PlotSpecError, PsResult};

    struct ChartViewer {
        image: Option<RgbImage>,
        texture: Option<egui::TextureHandle>,
    }

    impl eframe::App for ChartViewer {
        fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
            if let Some(image) = self.image.take() {
                let size = [image.width() as usize, image.height() as usize];
                let color_image = egui::ColorImage::from_rgb(size, image.as_raw());
                self.texture =
                    Some(ctx.load_texture("chart", color_image, egui::TextureOptions::LINEAR));
            }
            egui::CentralPanel::default()
                .frame(egui::Frame::NONE.fill(egui::Color32::WHITE))
                .show(ctx, |ui| {
                    if let Some(texture) = &self.texture {
                        ui.centered_and_justified(|ui| {
                            ui.add(
                                egui::Image::from_texture((texture.id(), texture.size_vec2()))
                                    .shrink_to_fit(),
                            );
                        });
                    }
                });
        }
    }

    #[allow(clippy::cast_precision_loss)]
    pub fn open(title: &str, image: RgbImage) -> PsResult<()> {
        let size = [image.width() as f32, image.height() as f32];
        let options = eframe::NativeOptions {
            viewport: egui::ViewportBuilder::default()
                .with_inner_size(size)
                .with_min_inner_size([400.0, 300.0]),
            ..Default::default()
        };
        let app = ChartViewer {
            image: Some(image),
            texture: None,
        };
        eframe::run_native(title, options, Box::new(|_cc| Ok(Box::new(app))))
            .map_err(|e| PlotSpecError::Other(format!("viewer failed: {e}")))
    }
}

/// Shows the chart in a window and blocks until the window is closed.
/// # Errors
/// This function returns an error if the chart cannot be rendered or the window cannot be opened.
#[cfg(feature = "viewer")]
pub fn show(chart: &Chart) -> PsResult<()> {
    let image = crate::export::raster::render_rgb(chart, VIEWER_SCALE)?;
    window::open(chart.title(), image)
}

/// Shows the chart in a window. This build has no window support, so only a warning is logged.
/// # Errors
/// This function does not fail.
#[cfg(not(feature = "viewer"))]
pub fn show(chart: &Chart) -> PsResult<()> {
    log::warn!(
        "plotspec was built without the viewer feature. Not showing \"{}\".",
        chart.title()
    );
    Ok(())
}
