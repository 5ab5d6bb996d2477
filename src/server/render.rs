//! Server-side HTML rendering.
//!
//! Pages are minijinja templates compiled into the binary. Templates ending in
//! `.html` are auto-escaped, so labels and error messages can be passed in as
//! plain strings.

use crate::core::constants::ACCEPTED_EXTENSIONS;
use crate::domain::{ABOUT, CATALOG, PredictionResult, ProbabilityVector};
use base64::Engine;
use minijinja::{Environment, UndefinedBehavior, Value, context};
use serde::Serialize;

/// Shown when the classifier is not confident the image shows a banana.
pub const REJECTION_MESSAGE: &str =
    "Gambar yang diunggah tampaknya bukan gambar pisang. Silakan coba unggah gambar pisang.";
/// Shown when the upload is not a readable image.
pub const INPUT_ERROR_MESSAGE: &str =
    "Berkas tidak dapat dibaca sebagai gambar. Silakan unggah gambar JPG, JPEG, atau PNG.";
/// Shown when classification fails on the server side.
pub const INTERNAL_ERROR_MESSAGE: &str =
    "Terjadi kesalahan saat melakukan klasifikasi. Silakan coba lagi.";

/// A status message above the result panel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Banner {
    /// CSS class: `success`, `info`, `warning` or `error`.
    pub kind: &'static str,
    pub title: Option<String>,
    pub text: String,
}

impl Banner {
    /// The pair of banners shown for an accepted prediction.
    pub fn accepted(result: &PredictionResult) -> Vec<Banner> {
        vec![
            Banner {
                kind: "success",
                title: Some("Jenis Pisang Terprediksi:".to_string()),
                text: result.label.to_string(),
            },
            Banner {
                kind: "info",
                title: Some("Keyakinan (Confidence):".to_string()),
                text: format!("{:.2}%", result.confidence_percent()),
            },
        ]
    }

    pub fn rejected() -> Banner {
        Banner {
            kind: "warning",
            title: None,
            text: REJECTION_MESSAGE.to_string(),
        }
    }

    pub fn error(text: impl Into<String>) -> Banner {
        Banner {
            kind: "error",
            title: None,
            text: text.into(),
        }
    }
}

#[derive(Debug, Serialize)]
struct Tick {
    x: f32,
    text: String,
}

#[derive(Debug, Serialize)]
struct Bar {
    label: &'static str,
    y: f32,
    height: f32,
    width: f32,
    value_x: f32,
    value_text: String,
}

/// Geometry of the horizontal probability bar chart.
///
/// The x axis always spans 0 to 1 and every bar is labelled with its value
/// to two decimals.
#[derive(Debug, Serialize)]
struct Chart {
    width: f32,
    height: f32,
    left: f32,
    top: f32,
    plot_width: f32,
    axis_y: f32,
    ticks: Vec<Tick>,
    bars: Vec<Bar>,
}

const CHART_WIDTH: f32 = 640.0;
const CHART_LEFT: f32 = 150.0;
const CHART_RIGHT_MARGIN: f32 = 50.0;
const CHART_TOP: f32 = 36.0;
const ROW_HEIGHT: f32 = 44.0;
const BAR_HEIGHT: f32 = 28.0;

impl Chart {
    fn new(probabilities: &ProbabilityVector) -> Self {
        let plot_width = CHART_WIDTH - CHART_LEFT - CHART_RIGHT_MARGIN;
        let bars: Vec<Bar> = probabilities
            .iter()
            .enumerate()
            .map(|(row, (label, value))| {
                let width = value.clamp(0.0, 1.0) * plot_width;
                Bar {
                    label: label.display_name(),
                    y: CHART_TOP + row as f32 * ROW_HEIGHT + (ROW_HEIGHT - BAR_HEIGHT) / 2.0,
                    height: BAR_HEIGHT,
                    width,
                    value_x: CHART_LEFT + width + 0.01 * plot_width,
                    value_text: format!("{value:.2}"),
                }
            })
            .collect();
        let axis_y = CHART_TOP + bars.len() as f32 * ROW_HEIGHT;
        let ticks = (0..=5)
            .map(|i| {
                let fraction = i as f32 / 5.0;
                Tick {
                    x: CHART_LEFT + fraction * plot_width,
                    text: format!("{fraction:.1}"),
                }
            })
            .collect();

        Self {
            width: CHART_WIDTH,
            height: axis_y + 44.0,
            left: CHART_LEFT,
            top: CHART_TOP,
            plot_width,
            axis_y,
            ticks,
            bars,
        }
    }
}

#[derive(Debug, Serialize)]
struct Row {
    label: &'static str,
    percent: String,
}

#[derive(Debug, Serialize)]
struct ResultView {
    rows: Vec<Row>,
}

impl ResultView {
    fn new(result: &PredictionResult) -> Self {
        Self {
            rows: result
                .probabilities
                .iter()
                .map(|(label, value)| Row {
                    label: label.display_name(),
                    percent: format!("{:.2}%", value * 100.0),
                })
                .collect(),
        }
    }
}

/// Builds a `data:` URL that shows the uploaded bytes back in the page.
///
/// Returns `None` when the bytes are not a recognised image.
pub fn preview_data_url(bytes: &[u8]) -> Option<String> {
    let format = image::guess_format(bytes).ok()?;
    let encoded = base64::engine::general_purpose::STANDARD.encode(bytes);
    Some(format!("data:{};base64,{}", format.to_mime_type(), encoded))
}

/// The compiled page templates.
#[derive(Debug)]
pub struct Templates {
    env: Environment<'static>,
}

impl Templates {
    pub fn new() -> Result<Self, minijinja::Error> {
        let mut env = Environment::new();
        env.set_undefined_behavior(UndefinedBehavior::Strict);
        env.add_template("base.html", include_str!("../../templates/base.html"))?;
        env.add_template("home.html", include_str!("../../templates/home.html"))?;
        env.add_template("varieties.html", include_str!("../../templates/varieties.html"))?;
        env.add_template("about.html", include_str!("../../templates/about.html"))?;
        Ok(Self { env })
    }

    /// Renders the home page.
    ///
    /// The result panel (chart and table) is drawn only when `result` is set.
    /// `preview` is a `data:` URL of the uploaded image, shown under the form.
    pub fn home(
        &self,
        banners: &[Banner],
        result: Option<&PredictionResult>,
        preview: Option<&str>,
    ) -> Result<String, minijinja::Error> {
        let accept = ACCEPTED_EXTENSIONS
            .iter()
            .map(|ext| format!(".{ext}"))
            .collect::<Vec<_>>()
            .join(",");
        self.env.get_template("home.html")?.render(context! {
            active => "home",
            logo => ABOUT.logo,
            accept,
            banners,
            // Base64 output never contains markup.
            preview => preview.map(|url| Value::from_safe_string(url.to_string())),
            result => result.map(ResultView::new),
            chart => result.map(|r| Chart::new(&r.probabilities)),
        })
    }

    pub fn varieties(&self) -> Result<String, minijinja::Error> {
        self.env.get_template("varieties.html")?.render(context! {
            active => "varieties",
            logo => ABOUT.logo,
            varieties => &CATALOG[..],
        })
    }

    pub fn about(&self) -> Result<String, minijinja::Error> {
        self.env.get_template("about.html")?.render(context! {
            active => "about",
            logo => ABOUT.logo,
            about => &ABOUT,
        })
    }
}
