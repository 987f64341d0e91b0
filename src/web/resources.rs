use axum::{routing::get, Json, Router};
use once_cell::sync::Lazy;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct Resource {
    pub title: &'static str,
    pub description: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<&'static str>,
    pub url: &'static str,
}

static RESOURCES: Lazy<Vec<Resource>> = Lazy::new(|| {
    vec![
        Resource {
            title: "National Suicide Prevention Lifeline",
            description: "24/7 free and confidential support for people in distress",
            phone: Some("1-800-273-8255"),
            url: "https://suicidepreventionlifeline.org",
        },
        Resource {
            title: "Crisis Text Line",
            description: "Text HOME to 741741 for free, 24/7 crisis counseling",
            phone: Some("Text HOME to 741741"),
            url: "https://www.crisistextline.org",
        },
        Resource {
            title: "NAMI Helpline",
            description: "National Alliance on Mental Illness information and support",
            phone: Some("1-800-950-NAMI (6264)"),
            url: "https://www.nami.org",
        },
        Resource {
            title: "Mindfulness Exercises",
            description: "Free guided mindfulness and meditation exercises",
            phone: None,
            url: "https://www.mindful.org/free-mindfulness-resources/",
        },
        Resource {
            title: "7 Cups",
            description: "Free online therapy and counseling with trained listeners",
            phone: None,
            url: "https://www.7cups.com",
        },
    ]
});

pub fn router() -> Router {
    Router::new().route("/", get(list_resources))
}

async fn list_resources() -> Json<Vec<Resource>> {
    Json(RESOURCES.clone())
}
