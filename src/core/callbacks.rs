use crate::utils::error::FacadeError;

pub type SuccessFn<T> = Box<dyn FnOnce(T) + Send>;
pub type ErrorFn = Box<dyn FnOnce(FacadeError) + Send>;

/// Success and error continuations for one facade call. Both are optional;
/// read operations that only exist to deliver data refuse to run without a
/// success continuation.
pub struct Callbacks<T> {
    on_success: Option<SuccessFn<T>>,
    on_error: Option<ErrorFn>,
}

impl<T> Callbacks<T> {
    pub fn none() -> Self {
        Self {
            on_success: None,
            on_error: None,
        }
    }

    pub fn on_success<F>(callback: F) -> Self
    where
        F: FnOnce(T) + Send + 'static,
    {
        Self {
            on_success: Some(Box::new(callback)),
            on_error: None,
        }
    }

    pub fn on_error<F>(callback: F) -> Self
    where
        F: FnOnce(FacadeError) + Send + 'static,
    {
        Self {
            on_success: None,
            on_error: Some(Box::new(callback)),
        }
    }

    pub fn with_error<F>(mut self, callback: F) -> Self
    where
        F: FnOnce(FacadeError) + Send + 'static,
    {
        self.on_error = Some(Box::new(callback));
        self
    }

    pub fn has_success(&self) -> bool {
        self.on_success.is_some()
    }

    pub fn has_error(&self) -> bool {
        self.on_error.is_some()
    }

    pub(crate) fn succeed(self, value: T) {
        if let Some(callback) = self.on_success {
            callback(value);
        }
    }

    /// Hands `error` to the error continuation. Gives it back when nobody
    /// is listening for it.
    pub(crate) fn fail(self, error: FacadeError) -> Option<FacadeError> {
        match self.on_error {
            Some(callback) => {
                callback(error);
                None
            }
            None => Some(error),
        }
    }
}

impl<T> Default for Callbacks<T> {
    fn default() -> Self {
        Self::none()
    }
}

impl<T> std::fmt::Debug for Callbacks<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Callbacks")
            .field("on_success", &self.has_success())
            .field("on_error", &self.has_error())
            .finish()
    }
}
