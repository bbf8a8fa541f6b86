use async_trait::async_trait;
use std::collections::HashMap;

/// Something that wants to hear when the server-side model may have changed.
pub trait ModelListener: Send + Sync {
    fn model_changed(&self) -> anyhow::Result<()>;
}

impl<F> ModelListener for F
where
    F: Fn() -> anyhow::Result<()> + Send + Sync,
{
    fn model_changed(&self) -> anyhow::Result<()> {
        self()
    }
}

/// User-facing surface the facade talks to for prompts and popups.
#[async_trait]
pub trait Interaction: Send + Sync {
    /// Asks the user for a value. `None` means the prompt was dismissed.
    async fn prompt_for_value(&self, message: &str) -> Option<String>;

    /// Blocking notice to the user.
    fn alert(&self, message: &str);

    fn open_popup(&self, target: &str, title: &str, height: u32, width: u32);

    fn show_html(&self, html: &str, title: &str, height: u32, width: u32);
}

pub trait ConfigProvider: Send + Sync {
    fn server_url(&self) -> &str;
    fn driver_pattern(&self) -> &str;
    fn default_headers(&self) -> &HashMap<String, String>;
}
