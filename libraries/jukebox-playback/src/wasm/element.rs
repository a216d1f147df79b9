//! `HTMLAudioElement` as a media element

use crate::element::{EventSink, MediaElement, MediaEvent, PlayOutcome, PlayRequest, SubscriptionId};
use crate::error::Result;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{EventTarget, HtmlAudioElement};

/// DOM events forwarded as lifecycle signals
const SIGNALS: [(&str, MediaEvent); 4] = [
    ("loadedmetadata", MediaEvent::MetadataLoaded),
    ("timeupdate", MediaEvent::TimeUpdate),
    ("ended", MediaEvent::Ended),
    ("canplay", MediaEvent::CanPlay),
];

type SignalHook = Rc<RefCell<Option<Rc<dyn Fn()>>>>;

struct Listener {
    event_type: &'static str,
    callback: Closure<dyn FnMut()>,
}

struct Subscription {
    id: SubscriptionId,
    sink: EventSink,
    listeners: Vec<Listener>,
}

/// Browser media element
///
/// Each subscription owns its DOM listeners; they are removed again by
/// `unsubscribe` or when the element is dropped.
pub struct WebAudioElement {
    audio: HtmlAudioElement,
    subscriptions: Vec<Subscription>,
    next_subscription: u64,
    hook: SignalHook,
}

impl WebAudioElement {
    /// Create a detached `<audio>` element
    pub fn new() -> std::result::Result<Self, JsValue> {
        Ok(Self::from_element(HtmlAudioElement::new()?))
    }

    /// Wrap an existing `<audio>` element
    pub fn from_element(audio: HtmlAudioElement) -> Self {
        audio.set_preload("auto");
        Self {
            audio,
            subscriptions: Vec::new(),
            next_subscription: 0,
            hook: Rc::new(RefCell::new(None)),
        }
    }

    /// Underlying DOM element
    pub fn audio(&self) -> &HtmlAudioElement {
        &self.audio
    }

    /// Run `hook` after every signal has been queued
    ///
    /// Lets the owner schedule a pump of the controller.
    pub fn set_signal_hook(&self, hook: impl Fn() + 'static) {
        *self.hook.borrow_mut() = Some(Rc::new(hook));
    }

    fn sinks(&self) -> Vec<EventSink> {
        self.subscriptions.iter().map(|s| s.sink.clone()).collect()
    }

    fn detach(&self, subscription: &Subscription) {
        let target: &EventTarget = self.audio.as_ref();
        for listener in &subscription.listeners {
            target
                .remove_event_listener_with_callback(
                    listener.event_type,
                    listener.callback.as_ref().unchecked_ref(),
                )
                .ok();
        }
    }
}

fn notify(hook: &SignalHook) {
    // Clone out of the cell so the hook may replace itself
    let hook = hook.borrow().clone();
    if let Some(hook) = hook {
        hook();
    }
}

fn rejection_reason(error: &JsValue) -> String {
    error
        .as_string()
        .or_else(|| {
            js_sys::Reflect::get(error, &JsValue::from_str("name"))
                .ok()
                .and_then(|name| name.as_string())
        })
        .unwrap_or_else(|| "play() rejected".to_string())
}

impl MediaElement for WebAudioElement {
    fn load(&mut self, source_uri: &str) -> Result<()> {
        // load() discards media tasks the old source still had queued
        self.audio.set_src(source_uri);
        self.audio.load();

        for sink in self.sinks() {
            sink.emit(MediaEvent::SourceChanged);
        }
        notify(&self.hook);
        Ok(())
    }

    fn play(&mut self, request: PlayRequest) {
        let sinks = self.sinks();
        let hook = self.hook.clone();

        let resolve = move |outcome: PlayOutcome| {
            for sink in &sinks {
                sink.emit(MediaEvent::PlayResolved {
                    request,
                    outcome: outcome.clone(),
                });
            }
            notify(&hook);
        };

        match self.audio.play() {
            Ok(promise) => wasm_bindgen_futures::spawn_local(async move {
                let outcome = match JsFuture::from(promise).await {
                    Ok(_) => PlayOutcome::Started,
                    Err(e) => PlayOutcome::Rejected(rejection_reason(&e)),
                };
                resolve(outcome);
            }),
            Err(e) => resolve(PlayOutcome::Rejected(rejection_reason(&e))),
        }
    }

    fn pause(&mut self) {
        self.audio.pause().ok();
    }

    fn volume(&self) -> f64 {
        self.audio.volume()
    }

    fn set_volume(&mut self, volume: f64) {
        self.audio.set_volume(volume.clamp(0.0, 1.0));
    }

    fn current_time(&self) -> f64 {
        self.audio.current_time()
    }

    fn set_current_time(&mut self, seconds: f64) {
        self.audio.set_current_time(seconds);
    }

    fn duration(&self) -> f64 {
        self.audio.duration()
    }

    fn subscribe(&mut self, sink: EventSink) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;

        let target: &EventTarget = self.audio.as_ref();
        let mut listeners = Vec::with_capacity(SIGNALS.len());
        for (event_type, signal) in SIGNALS {
            let sink = sink.clone();
            let hook = self.hook.clone();
            let callback = Closure::wrap(Box::new(move || {
                sink.emit(signal.clone());
                notify(&hook);
            }) as Box<dyn FnMut()>);

            if target
                .add_event_listener_with_callback(event_type, callback.as_ref().unchecked_ref())
                .is_ok()
            {
                listeners.push(Listener {
                    event_type,
                    callback,
                });
            } else {
                tracing::warn!(event_type, "Failed to attach media listener");
            }
        }

        self.subscriptions.push(Subscription {
            id,
            sink,
            listeners,
        });
        id
    }

    fn unsubscribe(&mut self, id: SubscriptionId) {
        if let Some(position) = self.subscriptions.iter().position(|s| s.id == id) {
            let subscription = self.subscriptions.remove(position);
            self.detach(&subscription);
        }
    }
}

impl Drop for WebAudioElement {
    fn drop(&mut self) {
        for subscription in &self.subscriptions {
            self.detach(subscription);
        }
        self.audio.pause().ok();
    }
}
