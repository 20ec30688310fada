use ambient::{AmbientLayout, ColorSample};
use iced::widget::{container, image, stack, text};
use iced::{Color, ContentFit, Element, Length};
use raster::Bitmap;

const CONTENT_PADDING: u16 = 24;

/// UI-ready handles for the content layer and its blurred glow.
#[derive(Debug, Clone, PartialEq)]
pub struct GlowImages {
    pub content: image::Handle,
    pub glow: image::Handle,
}

impl GlowImages {
    pub fn from_bitmaps(content: &Bitmap, glow: &Bitmap) -> Self {
        Self {
            content: handle_from_bitmap(content),
            glow: handle_from_bitmap(glow),
        }
    }
}

fn handle_from_bitmap(bitmap: &Bitmap) -> image::Handle {
    image::Handle::from_rgba(bitmap.width(), bitmap.height(), bitmap.as_raw().clone())
}

/// Background color for the sampled accent; the sentinel stays transparent.
pub fn accent_background(color: ColorSample) -> Color {
    match color.channels() {
        Some([r, g, b]) => Color::from_rgb8(r, g, b),
        None => Color::TRANSPARENT,
    }
}

/// Renders the glow layer under the padded content layer.
pub fn view<'a, Message>(images: Option<&GlowImages>, layout: &AmbientLayout) -> Element<'a, Message>
where
    Message: 'a,
{
    let Some(images) = images else {
        return container(text("No image"))
            .center_x(Length::Fill)
            .center_y(Length::Fill)
            .width(Length::Fill)
            .height(Length::Fill)
            .into();
    };

    let opacity = layout.glow.style.opacity.unwrap_or(1.0) as f32;
    let glow = image(images.glow.clone())
        .content_fit(ContentFit::Cover)
        .opacity(opacity)
        .width(Length::Fill)
        .height(Length::Fill);

    let content = container(
        image(images.content.clone())
            .content_fit(ContentFit::Contain)
            .width(Length::Fill)
            .height(Length::Fill),
    )
    .padding(CONTENT_PADDING)
    .width(Length::Fill)
    .height(Length::Fill);

    stack![glow, content]
        .width(Length::Fill)
        .height(Length::Fill)
        .into()
}

#[cfg(test)]
mod tests {
    use ambient::ColorSample;
    use iced::Color;
    use iced::widget::image;
    use raster::Bitmap;

    use super::{GlowImages, accent_background};

    #[test]
    fn converts_bitmaps_into_rgba_handles() {
        let content = Bitmap::new(2, 1);
        let glow = Bitmap::new(1, 1);

        let images = GlowImages::from_bitmaps(&content, &glow);

        let image::Handle::Rgba {
            width,
            height,
            pixels,
            ..
        } = images.content
        else {
            panic!("expected rgba handle");
        };
        assert_eq!(width, 2);
        assert_eq!(height, 1);
        assert_eq!(pixels.len(), 8);

        let image::Handle::Rgba { pixels, .. } = images.glow else {
            panic!("expected rgba handle");
        };
        assert_eq!(pixels.len(), 4);
    }

    #[test]
    fn accent_background_follows_sample() {
        assert_eq!(
            accent_background(ColorSample::rgb(255, 0, 0)),
            Color::from_rgb8(255, 0, 0)
        );
        assert_eq!(
            accent_background(ColorSample::Transparent),
            Color::TRANSPARENT
        );
    }
}
