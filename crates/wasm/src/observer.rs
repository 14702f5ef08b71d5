use std::rc::Rc;

use dawn_contrast_core::dom::{Change, ChangeBatch, ObserveOptions, Observer};
use futures_channel::mpsc::UnboundedSender;
use js_sys::Array;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Element, MutationObserver, MutationObserverInit, MutationRecord};

type Callback = Closure<dyn FnMut(Array, MutationObserver)>;

/// A `MutationObserver` feeding change batches into a channel.
///
/// The callback closure lives as long as the observer; dropping this value
/// disconnects first so the closure is never invoked after it is freed.
pub struct WebObserver {
    observer: MutationObserver,
    _callback: Callback,
}

impl WebObserver {
    pub fn observe(
        root: &Element,
        options: ObserveOptions<'_>,
        sink: UnboundedSender<ChangeBatch<Element>>,
        on_batch: Rc<dyn Fn()>,
    ) -> Result<Self, JsValue> {
        let callback = Callback::new(move |records: Array, _observer: MutationObserver| {
            let batch = to_batch(&records);
            if batch.is_empty() {
                return;
            }
            if sink.unbounded_send(batch).is_ok() {
                on_batch();
            }
        });
        let observer = MutationObserver::new(callback.as_ref().unchecked_ref())?;

        let init = MutationObserverInit::new();
        init.set_subtree(true);
        init.set_child_list(options.child_list);
        if !options.attribute_filter.is_empty() {
            let filter: Array = options
                .attribute_filter
                .iter()
                .map(|name| JsValue::from_str(name))
                .collect();
            init.set_attributes(true);
            init.set_attribute_filter(&filter);
        }
        observer.observe_with_options(root, &init)?;

        Ok(Self {
            observer,
            _callback: callback,
        })
    }
}

fn to_batch(records: &Array) -> ChangeBatch<Element> {
    let mut batch = Vec::new();
    for record in records.iter() {
        let Ok(record) = record.dyn_into::<MutationRecord>() else {
            continue;
        };
        match record.type_().as_str() {
            "childList" => {
                let added = record.added_nodes();
                batch.extend(
                    (0..added.length())
                        .filter_map(|i| added.get(i))
                        .filter_map(|node| node.dyn_into::<Element>().ok())
                        .map(Change::Inserted),
                );
            }
            "attributes" => {
                let target = record
                    .target()
                    .and_then(|node| node.dyn_into::<Element>().ok());
                if let (Some(target), Some(name)) = (target, record.attribute_name()) {
                    batch.push(Change::Attribute { target, name });
                }
            }
            _ => {}
        }
    }
    batch
}

impl Observer for WebObserver {
    fn disconnect(&mut self) {
        self.observer.disconnect();
    }
}

impl Drop for WebObserver {
    fn drop(&mut self) {
        self.observer.disconnect();
    }
}
