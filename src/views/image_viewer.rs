use crate::enhancement::{CONTRAST_LIMIT_RANGE, DENOISE_STRENGTH_RANGE};
use crate::message::Message;
use crate::model::{EnhancedXray, LoadedXray, XraySource};
use crate::utils::{format_dimensions, truncate_caption};
use iced::widget::image::Handle;
use iced::widget::text::Wrapping;
use iced::widget::{button, column, container, row, slider, text, Image};
use iced::{Alignment, Element, Length};

const PREVIEW_HEIGHT: f32 = 320.0;

pub struct EnhancementControls {
    pub denoise_strength: u8,
    pub contrast_limit: f32,
    pub enhancing: bool,
}

pub fn image_panel<'a>(
    xray: Option<&'a LoadedXray>,
    enhanced: Option<&'a EnhancedXray>,
    controls: EnhancementControls,
) -> Element<'a, Message> {
    let upload = button("Upload a dental X-ray image (JPEG, PNG or DICOM)")
        .on_press(Message::PickImage);

    let Some(xray) = xray else {
        return column![
            text("X-Ray Upload & Processing").size(22),
            upload,
            text("No image loaded"),
        ]
        .spacing(12)
        .into();
    };

    let source = match xray.source {
        XraySource::Raster => "Image",
        XraySource::Dicom => "DICOM",
    };
    let caption = format!(
        "{source}: {} ({})",
        truncate_caption(&xray.file_path.display().to_string()),
        format_dimensions(xray.pixels.width(), xray.pixels.height())
    );

    let enhanced_preview: Element<'a, Message> = match enhanced {
        Some(enhanced) if !controls.enhancing => preview(&enhanced.preview, "Enhanced X-ray"),
        Some(enhanced) => column![
            preview(&enhanced.preview, "Enhanced X-ray"),
            text("Updating…").size(14)
        ]
        .spacing(4)
        .into(),
        None => container(text("Enhancing…"))
            .height(Length::Fixed(PREVIEW_HEIGHT))
            .align_y(Alignment::Center)
            .into(),
    };

    let previews = row![
        container(preview(&xray.preview, "Original X-ray")).width(Length::FillPortion(1)),
        container(enhanced_preview).width(Length::FillPortion(1)),
    ]
    .spacing(12);

    let denoise = slider(
        DENOISE_STRENGTH_RANGE,
        controls.denoise_strength,
        Message::DenoiseChanged,
    )
    .on_release(Message::ApplyEnhancement);

    let contrast = slider(
        CONTRAST_LIMIT_RANGE,
        controls.contrast_limit,
        Message::ContrastChanged,
    )
    .step(0.1f32)
    .on_release(Message::ApplyEnhancement);

    column![
        text("X-Ray Upload & Processing").size(22),
        upload,
        text(caption).size(14).wrapping(Wrapping::Word),
        previews,
        text("Image Enhancement Options").size(18),
        text(format!("Denoising Strength: {}", controls.denoise_strength)),
        denoise,
        text(format!("Contrast Enhancement: {:.1}", controls.contrast_limit)),
        contrast,
        button("Reset to defaults").on_press(Message::ResetEnhancement),
    ]
    .spacing(12)
    .into()
}

fn preview<'a>(handle: &Handle, caption: &'a str) -> Element<'a, Message> {
    column![
        Image::new(handle.clone())
            .width(Length::Fill)
            .height(Length::Fixed(PREVIEW_HEIGHT)),
        text(caption).size(14),
    ]
    .spacing(4)
    .align_x(Alignment::Center)
    .into()
}
