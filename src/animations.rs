use serde::Serialize;
use serde_json::Value;

/// Options for a GSAP `from` tween.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Tween {
    pub duration: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scale: Option<f64>,
    pub opacity: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delay: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stagger: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ease: Option<&'static str>,
    #[serde(rename = "scrollTrigger", skip_serializing_if = "Option::is_none")]
    pub scroll_trigger: Option<ScrollTrigger>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ScrollTrigger {
    pub trigger: &'static str,
    pub start: &'static str,
}

impl Tween {
    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

/// `(selector, tween)` pairs played once on page load.
pub fn entrance_animations() -> Vec<(&'static str, Tween)> {
    vec![
        (
            "header",
            Tween {
                duration: 1.0,
                y: Some(-100.0),
                ease: Some("power3.out"),
                ..Tween::default()
            },
        ),
        (
            ".hero-content",
            Tween {
                duration: 1.5,
                y: Some(50.0),
                delay: Some(0.5),
                ease: Some("power3.out"),
                ..Tween::default()
            },
        ),
        (
            ".content-card",
            Tween {
                duration: 1.0,
                y: Some(30.0),
                stagger: Some(0.2),
                scroll_trigger: Some(ScrollTrigger {
                    trigger: ".content-grid",
                    start: "top 80%",
                }),
                ..Tween::default()
            },
        ),
    ]
}

pub fn mobile_menu_slide() -> Tween {
    Tween {
        duration: 0.3,
        x: Some(300.0),
        ease: Some("power3.out"),
        ..Tween::default()
    }
}

pub fn link_reveal() -> Tween {
    Tween {
        duration: 0.5,
        scale: Some(0.5),
        ease: Some("back.out(1.7)"),
        ..Tween::default()
    }
}
