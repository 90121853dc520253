use std::sync::Arc;

use minijinja::{context, Environment, UndefinedBehavior};
use serde::Serialize;

use crate::writer::{History, Interaction, OutputLength};

const INDEX_TEMPLATE: &str = "index.html";

/// Build the template environment. `.html` templates are auto-escaped.
pub fn templates() -> Result<Arc<Environment<'static>>, minijinja::Error> {
    let mut env = Environment::new();
    env.set_undefined_behavior(UndefinedBehavior::Lenient);
    env.add_template(INDEX_TEMPLATE, include_str!("templates/index.html"))?;
    Ok(Arc::new(env))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BannerKind {
    Success,
    Warning,
    Error,
}

/// A one-line status message shown under the form.
#[derive(Debug, Clone, Serialize)]
pub struct Banner {
    pub kind: BannerKind,
    pub message: String,
}

impl Banner {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: BannerKind::Success,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            kind: BannerKind::Warning,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: BannerKind::Error,
            message: message.into(),
        }
    }
}

#[derive(Serialize)]
struct LengthOption {
    value: &'static str,
    label: &'static str,
    selected: bool,
}

/// Everything the page shows for one response.
#[derive(Debug, Default)]
pub struct Page<'a> {
    pub prompt: &'a str,
    pub length: OutputLength,
    pub banner: Option<Banner>,
    pub latest: Option<&'a Interaction>,
    pub load_error: Option<&'a str>,
}

/// Render the page with `history` in the side column, newest first.
pub fn render_page(
    env: &Environment<'_>,
    page: &Page<'_>,
    history: &History,
) -> Result<String, minijinja::Error> {
    let lengths: Vec<LengthOption> = OutputLength::ALL
        .iter()
        .map(|&length| LengthOption {
            value: length.value(),
            label: length.label(),
            selected: length == page.length,
        })
        .collect();
    let history: Vec<&Interaction> = history.recent_first().collect();

    env.get_template(INDEX_TEMPLATE)?.render(context! {
        prompt => page.prompt,
        lengths => lengths,
        banner => &page.banner,
        latest => page.latest,
        load_error => page.load_error,
        history => history,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::writer::Sentiment;

    fn render(page: &Page<'_>, history: &History) -> String {
        let env = templates().unwrap();
        render_page(&env, page, history).unwrap()
    }

    #[test]
    fn empty_history_placeholder() {
        let html = render(&Page::default(), &History::new());
        assert!(html.contains("No interactions yet."));
        assert!(html.contains("Analyzing sentiment and generating text..."));
        assert!(html.contains(r#"<option value="medium" selected>Medium (~120 words)</option>"#));
    }

    #[test]
    fn history_is_newest_first() {
        let mut history = History::new();
        history.record("older prompt", Sentiment::Negative, "rain");
        history.record("newer prompt", Sentiment::Positive, "sun");

        let html = render(&Page::default(), &history);
        let newer = html.find("newer prompt").unwrap();
        let older = html.find("older prompt").unwrap();
        assert!(newer < older);
        assert!(!html.contains("No interactions yet."));
        assert!(html.contains("/download/2"));
    }

    #[test]
    fn user_text_is_escaped() {
        let mut history = History::new();
        history.record("<script>alert(1)</script>", Sentiment::Neutral, "ok");

        let html = render(&Page::default(), &history);
        assert!(!html.contains("<script>alert(1)</script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn banner_and_latest_result() {
        let mut history = History::new();
        let latest = history.record("beach", Sentiment::Positive, "Golden sand.").clone();
        let page = Page {
            prompt: "beach",
            length: OutputLength::Long,
            banner: Some(Banner::success("Detected sentiment: POSITIVE")),
            latest: Some(&latest),
            load_error: None,
        };

        let html = render(&page, &history);
        assert!(html.contains(r#"class="banner success""#));
        assert!(html.contains("Detected sentiment: POSITIVE"));
        assert!(html.contains("/download/1?kind=result"));
        assert!(html.contains(r#"<option value="long" selected>"#));
    }
}
