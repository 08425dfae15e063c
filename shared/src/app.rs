use std::collections::HashMap;
use std::sync::Arc;

use log::{debug, info, trace};

use crate::page::{ElementRegistry, Notifier};
use crate::refresh::{Refresher, Settled};

pub const REFRESH_CONTROL: &str = "btn-refresh";
pub const SUBMIT_CONTROL: &str = "btn-enviar";

pub const SUBMIT_MESSAGE: &str = "Form submitted successfully!";

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum PageEvent {
    /// The page finished loading and its elements can be looked up.
    Ready,
    /// A control was activated.
    Click(String),
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Action {
    Refresh,
    Submit,
}

pub struct App {
    refresher: Refresher,
    registry: Arc<dyn ElementRegistry>,
    notifier: Arc<dyn Notifier>,

    bindings: HashMap<String, Action>,
}

impl App {
    pub fn new(
        refresher: Refresher,
        registry: Arc<dyn ElementRegistry>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            refresher,
            registry,
            notifier,

            bindings: HashMap::new(),
        }
    }

    fn wire(&mut self) {
        for (control, action) in [
            (REFRESH_CONTROL, Action::Refresh),
            (SUBMIT_CONTROL, Action::Submit),
        ] {
            if self.registry.element(control).is_some() {
                debug!("Binding '{}' to {:?}", control, action);
                self.bindings.insert(control.to_string(), action);
            } else {
                debug!("No '{}' control on the page", control);
            }
        }
    }

    fn submit(&self) {
        self.notifier.notify(SUBMIT_MESSAGE);
    }

    /// Handles one page event. Returns the refresh outcomes if the event
    /// caused a refresh.
    pub async fn handle(&mut self, event: PageEvent) -> Option<Vec<Settled>> {
        trace!("Event: {:?}", event);

        match event {
            PageEvent::Ready => {
                self.wire();
                info!("Page ready, loading images");
                Some(self.refresher.refresh_all().await)
            }

            PageEvent::Click(control) => {
                match self.bindings.get(&control).copied() {
                    Some(Action::Refresh) => {
                        Some(self.refresher.refresh_all().await)
                    }
                    Some(Action::Submit) => {
                        self.submit();
                        None
                    }
                    None => {
                        trace!("Ignoring click on unbound '{}'", control);
                        None
                    }
                }
            }
        }
    }
}
