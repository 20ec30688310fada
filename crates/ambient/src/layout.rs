use serde::Serialize;

use crate::props::{AmbientLightProps, MediaKind};

const CONTAINER_CLASS: &str = "ambient-glow";
const GLOW_SATURATION: f64 = 1.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LayerRole {
    Glow,
    Content,
    Overlay,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    Img,
    Video,
    Div,
}

/// Visual style of one layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerStyle {
    pub z_index: i32,
    pub blur_px: Option<f64>,
    pub saturate: Option<f64>,
    pub scale: Option<f64>,
    pub opacity: Option<f64>,
    pub pointer_events: bool,
    pub cover: bool,
}

impl LayerStyle {
    /// CSS `filter` value, if the layer is filtered.
    pub fn filter_css(&self) -> Option<String> {
        let mut parts = Vec::new();
        if let Some(blur) = self.blur_px {
            parts.push(format!("blur({blur}px)"));
        }
        if let Some(saturate) = self.saturate {
            parts.push(format!("saturate({saturate})"));
        }
        (!parts.is_empty()).then(|| parts.join(" "))
    }

    /// CSS `transform` value, if the layer is scaled.
    pub fn transform_css(&self) -> Option<String> {
        self.scale.map(|scale| format!("scale({scale})"))
    }

    /// Inline CSS declarations for this layer.
    ///
    /// # Example
    /// ```
    /// use ambient::{AmbientLightProps, layout};
    ///
    /// let css = layout(&AmbientLightProps::new("a.jpg", Default::default()), false)
    ///     .glow
    ///     .style
    ///     .to_css();
    /// assert!(css.contains("blur(40px)"));
    /// assert!(css.contains("scale(1.1)"));
    /// assert!(css.contains("opacity: 0.6"));
    /// ```
    pub fn to_css(&self) -> String {
        let mut declarations = Vec::new();
        if let Some(filter) = self.filter_css() {
            declarations.push(format!("filter: {filter}"));
        }
        if let Some(transform) = self.transform_css() {
            declarations.push(format!("transform: {transform}"));
        }
        if let Some(opacity) = self.opacity {
            declarations.push(format!("opacity: {opacity}"));
        }
        declarations.push(format!("z-index: {}", self.z_index));
        if !self.pointer_events {
            declarations.push("pointer-events: none".to_owned());
        }
        if self.cover {
            declarations.push("object-fit: cover".to_owned());
        }
        declarations.join("; ")
    }
}

/// Element attributes of a media layer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaAttributes {
    pub alt: Option<String>,
    pub aria_hidden: bool,
    pub tab_index: Option<i32>,
    pub autoplay: bool,
    pub controls: bool,
    pub muted: bool,
    #[serde(rename = "loop")]
    pub looped: bool,
    pub plays_inline: bool,
    pub lazy: bool,
}

/// One rendered layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Layer {
    pub role: LayerRole,
    pub element: ElementKind,
    pub src: Option<String>,
    pub style: LayerStyle,
    pub attributes: MediaAttributes,
}

/// Resolved layer stack of one component, glow beneath content.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AmbientLayout {
    pub class_name: String,
    pub glow: Layer,
    pub content: Layer,
    pub overlay: Option<Layer>,
}

impl AmbientLayout {
    /// Layers in document order.
    pub fn layers(&self) -> impl Iterator<Item = &Layer> {
        [&self.glow, &self.content]
            .into_iter()
            .chain(self.overlay.as_ref())
    }
}

/// Resolves the glow, content and optional overlay layers for `props`.
pub fn layout(props: &AmbientLightProps, has_children: bool) -> AmbientLayout {
    let element = match props.kind {
        MediaKind::Image => ElementKind::Img,
        MediaKind::Video => ElementKind::Video,
    };

    let glow = Layer {
        role: LayerRole::Glow,
        element,
        src: Some(props.src.clone()),
        style: LayerStyle {
            z_index: 0,
            blur_px: Some(props.blur),
            saturate: Some(GLOW_SATURATION),
            scale: Some(props.scale),
            opacity: Some(props.opacity),
            pointer_events: false,
            cover: true,
        },
        attributes: glow_attributes(props),
    };

    let content = Layer {
        role: LayerRole::Content,
        element,
        src: Some(props.src.clone()),
        style: LayerStyle {
            z_index: 1,
            blur_px: None,
            saturate: None,
            scale: None,
            opacity: None,
            pointer_events: true,
            cover: false,
        },
        attributes: content_attributes(props),
    };

    let overlay = has_children.then(|| Layer {
        role: LayerRole::Overlay,
        element: ElementKind::Div,
        src: None,
        style: LayerStyle {
            z_index: 2,
            blur_px: None,
            saturate: None,
            scale: None,
            opacity: None,
            pointer_events: true,
            cover: false,
        },
        attributes: MediaAttributes::default(),
    });

    AmbientLayout {
        class_name: format!("{CONTAINER_CLASS} {}", props.class_name)
            .trim()
            .to_owned(),
        glow,
        content,
        overlay,
    }
}

fn glow_attributes(props: &AmbientLightProps) -> MediaAttributes {
    match props.kind {
        MediaKind::Image => MediaAttributes {
            alt: Some(String::new()),
            aria_hidden: true,
            ..MediaAttributes::default()
        },
        // The glow video never autoplays on its own; it follows the primary.
        MediaKind::Video => MediaAttributes {
            aria_hidden: true,
            tab_index: Some(-1),
            muted: true,
            looped: props.video_loop,
            plays_inline: true,
            ..MediaAttributes::default()
        },
    }
}

fn content_attributes(props: &AmbientLightProps) -> MediaAttributes {
    match props.kind {
        MediaKind::Image => MediaAttributes {
            alt: Some(props.alt.clone()),
            lazy: true,
            ..MediaAttributes::default()
        },
        MediaKind::Video => MediaAttributes {
            autoplay: props.video_auto_play,
            controls: props.video_controls,
            muted: props.muted(),
            looped: props.video_loop,
            plays_inline: true,
            ..MediaAttributes::default()
        },
    }
}
