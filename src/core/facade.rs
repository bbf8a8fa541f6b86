use crate::adapters::http::HttpTransport;
use crate::core::callbacks::Callbacks;
use crate::core::handlers::DriverHandlers;
use crate::core::listeners::ListenerRegistry;
use crate::domain::model::{
    Connection, Dispatch, NotifySummary, RequestSpec, ResponseBody, ResponseEncoding,
};
use crate::domain::ports::{ConfigProvider, Interaction, ModelListener};
use crate::utils::error::Result;
use crate::utils::paths;
use regex::Regex;
use reqwest::Method;
use serde_json::Value;
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

/// Entry point for everything the UI asks of the modeling server.
///
/// Each operation sends at most one request, hands the response to the
/// caller's continuations and, for operations that change server-side state,
/// notifies the registered listeners afterwards. Cloning yields another handle
/// onto the same listeners and handlers.
#[derive(Clone)]
pub struct ModelFacade {
    transport: HttpTransport,
    listeners: ListenerRegistry,
    handlers: DriverHandlers,
    driver_pattern: Regex,
    interaction: Arc<dyn Interaction>,
}

impl ModelFacade {
    pub fn new<C: ConfigProvider + ?Sized>(
        config: &C,
        interaction: Arc<dyn Interaction>,
    ) -> Result<Self> {
        let transport = HttpTransport::new(config)?;
        let driver_pattern = Regex::new(config.driver_pattern())?;

        tracing::info!("Model facade ready for {}", transport.base_url());

        Ok(Self {
            transport,
            listeners: ListenerRegistry::new(),
            handlers: DriverHandlers::new(),
            driver_pattern,
            interaction,
        })
    }

    pub fn transport(&self) -> &HttpTransport {
        &self.transport
    }

    pub fn listeners(&self) -> &ListenerRegistry {
        &self.listeners
    }

    pub fn driver_handlers(&self) -> &DriverHandlers {
        &self.handlers
    }

    pub fn add_listener<L: ModelListener + 'static>(&self, listener: L) {
        self.listeners.add_listener(listener);
    }

    pub fn add_weak_listener<L: ModelListener + 'static>(&self, listener: &Arc<L>) {
        self.listeners.add_weak_listener(listener);
    }

    pub fn on_change<F>(&self, callback: F)
    where
        F: Fn() -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.listeners.on_change(callback);
    }

    pub fn notify_listeners(&self) -> NotifySummary {
        self.listeners.notify_listeners()
    }

    /// Object types that can be instantiated in the model.
    pub async fn get_types(&self, callbacks: Callbacks<Value>) -> Dispatch {
        self.json_read("get_types", RequestSpec::get_json("types"), callbacks)
            .await
    }

    /// Replaces the server-side model with an empty one.
    pub async fn new_model(&self, callbacks: Callbacks<String>) -> Dispatch {
        self.text_exchange("new_model", RequestSpec::post_text("model"), callbacks, true)
            .await
    }

    pub async fn save_project(&self, callbacks: Callbacks<String>) -> Dispatch {
        self.text_exchange("save_project", RequestSpec::post_text("project"), callbacks, true)
            .await
    }

    /// Components in the workflow of the driver at `pathname`.
    pub async fn get_workflow(&self, pathname: &str, callbacks: Callbacks<Value>) -> Dispatch {
        let spec = RequestSpec::get_json(format!("workflow/{}", pathname));
        self.json_read("get_workflow", spec, callbacks).await
    }

    /// Data structure of the assembly at `pathname`; the top level when absent.
    pub async fn get_structure(
        &self,
        pathname: Option<&str>,
        callbacks: Callbacks<Value>,
    ) -> Dispatch {
        let spec = RequestSpec::get_json(format!("structure/{}", pathname.unwrap_or_default()));
        self.json_read("get_structure", spec, callbacks).await
    }

    /// Hierarchical listing of every component.
    pub async fn get_components(&self, callbacks: Callbacks<Value>) -> Dispatch {
        self.json_read("get_components", RequestSpec::get_json("components"), callbacks)
            .await
    }

    pub async fn get_component(&self, name: &str, callbacks: Callbacks<Value>) -> Dispatch {
        let spec = RequestSpec::get_json(format!("component/{}", name));
        self.json_read("get_component", spec, callbacks).await
    }

    /// Connections between two components of the assembly at `pathname`.
    pub async fn get_connections(
        &self,
        pathname: &str,
        src_name: &str,
        dst_name: &str,
        callbacks: Callbacks<Value>,
    ) -> Dispatch {
        let spec = RequestSpec::get_json(format!("connections/{}", pathname))
            .with_field("src_name", src_name)
            .with_field("dst_name", dst_name);
        self.json_read("get_connections", spec, callbacks).await
    }

    /// Replaces the connections between two components. Listeners are not
    /// notified; callers refresh from their own continuation.
    pub async fn set_connections(
        &self,
        pathname: &str,
        src_name: &str,
        dst_name: &str,
        connections: &[Connection],
        callbacks: Callbacks<Value>,
    ) -> Dispatch {
        let encoded = match serde_json::to_string(connections) {
            Ok(encoded) => encoded,
            Err(e) => return self.complete("set_connections", Err(e.into()), callbacks, false),
        };
        let spec = RequestSpec::new(
            Method::POST,
            format!("connections/{}", pathname),
            ResponseEncoding::Json,
        )
        .with_field("src_name", src_name)
        .with_field("dst_name", dst_name)
        .with_field("connections", encoded);

        let outcome = self.transport.send(&spec).await.map(ResponseBody::into_json);
        self.complete("set_connections", outcome, callbacks, false)
    }

    /// Adds an object of type `typepath` named `name` under `parent`.
    ///
    /// Drivers with a registered client-side handler of the same name are
    /// handed to that handler instead; no request is sent then.
    pub async fn add_component(
        &self,
        typepath: &str,
        name: &str,
        parent: Option<&str>,
        callbacks: Callbacks<String>,
    ) -> Dispatch {
        if self.driver_pattern.is_match(typepath) {
            if let Some(handler) = self.handlers.get(name) {
                tracing::debug!("Driver '{}' ({}) handled on the client", name, typepath);
                handler();
                return Dispatch::HandledLocally;
            }
        }

        let spec = RequestSpec::post_text(format!("component/{}", name))
            .with_field("type", typepath)
            .with_field("parent", parent.unwrap_or_default());
        self.text_exchange("add_component", spec, callbacks, true)
            .await
    }

    /// Runs `command` in the model's interpreter.
    pub async fn issue_command(&self, command: &str, callbacks: Callbacks<String>) -> Dispatch {
        let spec = RequestSpec::post_text("command").with_field("command", command);
        self.text_exchange("issue_command", spec, callbacks, true)
            .await
    }

    /// Output queued by the model since the last poll.
    pub async fn get_output(&self, callbacks: Callbacks<String>) -> Dispatch {
        self.text_exchange("get_output", RequestSpec::get_text("output"), callbacks, false)
            .await
    }

    /// Recursive listing of the model working directory.
    pub async fn get_files(&self, callbacks: Callbacks<Value>) -> Dispatch {
        self.json_read("get_files", RequestSpec::get_json("files"), callbacks)
            .await
    }

    pub async fn get_file(&self, filepath: &str, callbacks: Callbacks<String>) -> Dispatch {
        if !callbacks.has_success() {
            return skipped("get_file");
        }
        let spec = RequestSpec::get_text(format!("file{}", paths::normalize_separators(filepath)));
        self.text_exchange("get_file", spec, callbacks, false).await
    }

    pub async fn set_file(
        &self,
        filepath: &str,
        contents: &str,
        callbacks: Callbacks<String>,
    ) -> Dispatch {
        let spec = RequestSpec::post_text(format!("file/{}", paths::normalize_separators(filepath)))
            .with_field("contents", contents);
        self.text_exchange("set_file", spec, callbacks, true).await
    }

    pub async fn create_folder(&self, folderpath: &str, callbacks: Callbacks<String>) -> Dispatch {
        let spec =
            RequestSpec::post_text(format!("file/{}", paths::normalize_separators(folderpath)))
                .with_field("isFolder", "true");
        self.text_exchange("create_folder", spec, callbacks, true)
            .await
    }

    /// Asks for a file name and creates the file with starter content
    /// matching its extension. Nothing happens if the prompt is dismissed.
    pub async fn new_file(&self, folderpath: Option<&str>) -> Dispatch {
        let Some(name) = self
            .interaction
            .prompt_for_value("Specify a name for the new file")
            .await
        else {
            return skipped("new_file");
        };
        let name = paths::join_folder(folderpath, &name);
        let contents = paths::new_file_contents(&name);
        self.set_file(&name, &contents, Callbacks::none()).await
    }

    pub async fn new_folder(&self, folderpath: Option<&str>) -> Dispatch {
        let Some(name) = self
            .interaction
            .prompt_for_value("Specify a name for the new folder")
            .await
        else {
            return skipped("new_folder");
        };
        let name = paths::join_folder(folderpath, &name);
        self.create_folder(&name, Callbacks::none()).await
    }

    /// Opens the upload window. The upload itself happens outside the
    /// facade, so listeners are not notified.
    // TODO: send the upload through the transport so listeners can be notified.
    pub fn upload_file(&self) {
        self.interaction.open_popup("upload", "Add File", 150, 400);
    }

    /// Deletes a file. Listeners are notified whatever the outcome, since the
    /// server may report failure for a delete that went through.
    pub async fn remove_file(&self, filepath: &str) -> Dispatch {
        let spec = RequestSpec::new(
            Method::DELETE,
            format!("file{}", paths::normalize_separators(filepath)),
            ResponseEncoding::Text,
        )
        .with_field("file", filepath);

        let dispatch = match self.transport.send(&spec).await {
            Ok(_) => Dispatch::Completed,
            Err(e) => {
                tracing::warn!("remove_file {}: {}", filepath, e);
                Dispatch::Failed
            }
        };
        self.notify_listeners();
        dispatch
    }

    /// Imports a python file into the model namespace.
    pub async fn import_file(&self, filepath: &str, callbacks: Callbacks<String>) -> Dispatch {
        let command = format!("from {} import *", paths::import_path(filepath));
        self.issue_command(&command, callbacks).await
    }

    /// Runs the model and echoes its result back through the command channel.
    /// Failures are reported to the user directly.
    pub async fn run_model(&self) -> Dispatch {
        let spec = RequestSpec::post_text("exec");
        match self.transport.send(&spec).await {
            Ok(body) => {
                let text = body.into_text();
                let command = format!("print \"{}\"", text.replacen('\n', "\\n", 1));
                self.issue_command(&command, Callbacks::none()).await;
                Dispatch::Completed
            }
            Err(e) => {
                let status = e.status_code().unwrap_or(0);
                self.interaction.alert(&format!(
                    "Error running model (status={}): {}",
                    status,
                    e.status_text()
                ));
                self.interaction
                    .show_html(e.response_body(), "Error Running Model", 600, 400);
                tracing::error!("❌ Error running model: {}", e);
                Dispatch::Failed
            }
        }
    }

    /// Executes a script from the working directory.
    pub async fn exec_file(&self, filepath: &str) -> Dispatch {
        let spec = RequestSpec::post_text("exec")
            .with_field("filename", paths::relative_exec_path(filepath));
        self.text_exchange("exec_file", spec, Callbacks::none(), true)
            .await
    }

    /// Tells the server to shut the model down. Returns immediately.
    ///
    /// The request runs on the current tokio runtime; without one nothing is
    /// sent and `None` is returned.
    pub fn exit(&self) -> Option<JoinHandle<()>> {
        let runtime = match Handle::try_current() {
            Ok(runtime) => runtime,
            Err(e) => {
                tracing::warn!("Exit request not sent, no async runtime: {}", e);
                return None;
            }
        };
        let transport = self.transport.clone();
        Some(runtime.spawn(async move {
            match transport.send(&RequestSpec::post_text("exit")).await {
                Ok(_) => tracing::info!("Exit request accepted"),
                Err(e) => tracing::debug!("Exit request failed: {}", e),
            }
        }))
    }

    async fn json_read(
        &self,
        operation: &str,
        spec: RequestSpec,
        callbacks: Callbacks<Value>,
    ) -> Dispatch {
        if !callbacks.has_success() {
            return skipped(operation);
        }
        let outcome = self.transport.send(&spec).await.map(ResponseBody::into_json);
        self.complete(operation, outcome, callbacks, false)
    }

    async fn text_exchange(
        &self,
        operation: &str,
        spec: RequestSpec,
        callbacks: Callbacks<String>,
        notify: bool,
    ) -> Dispatch {
        let outcome = self.transport.send(&spec).await.map(ResponseBody::into_text);
        self.complete(operation, outcome, callbacks, notify)
    }

    fn complete<T>(
        &self,
        operation: &str,
        outcome: Result<T>,
        callbacks: Callbacks<T>,
        notify: bool,
    ) -> Dispatch {
        match outcome {
            Ok(value) => {
                callbacks.succeed(value);
                if notify {
                    self.notify_listeners();
                }
                Dispatch::Completed
            }
            Err(e) => {
                if let Some(unobserved) = callbacks.fail(e) {
                    tracing::debug!("{} failed with no error handler: {}", operation, unobserved);
                }
                Dispatch::Failed
            }
        }
    }
}

fn skipped(operation: &str) -> Dispatch {
    tracing::trace!("{}: nothing to deliver to, request not sent", operation);
    Dispatch::Skipped
}
