//! [`ScoreStore`] over a JavaScript backend object.
//!
//! The backend wraps whatever remote database the page uses and must provide:
//!
//! ```text
//! writeIfGreaterOrEqual(key, value, done(error, committed))
//! readOnce(key, done(error, value))
//! setRank(key, rank)
//! subscribeTopN(n, listener([{ name, score }, ...]))
//! ```

use std::cell::RefCell;
use std::rc::Rc;

use js_sys::{Function, Reflect, JSON};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use white_tile::highscore::store::{ReadDone, TopListener, WriteDone};
use white_tile::{HighscoreEntry, ScoreStore, StoreError};

pub struct JsScoreStore {
    backend: JsValue,
    listeners: RefCell<Vec<Closure<dyn FnMut(JsValue)>>>,
}

/// A completion shared between the JS callback and the local error path, so
/// exactly one of them runs it.
struct Pending<T>(Rc<RefCell<Option<Box<dyn FnOnce(Result<T, StoreError>)>>>>);

impl<T> Pending<T> {
    fn new(done: Box<dyn FnOnce(Result<T, StoreError>)>) -> Self {
        Self(Rc::new(RefCell::new(Some(done))))
    }

    fn share(&self) -> Self {
        Self(Rc::clone(&self.0))
    }

    fn finish(&self, result: Result<T, StoreError>) {
        let done = self.0.borrow_mut().take();
        if let Some(done) = done {
            done(result);
        }
    }
}

fn describe(value: &JsValue) -> String {
    value
        .as_string()
        .or_else(|| {
            JSON::stringify(value)
                .ok()
                .map(String::from)
        })
        .unwrap_or_else(|| format!("{:?}", value))
}

fn is_error(value: &JsValue) -> bool {
    !value.is_null() && !value.is_undefined()
}

impl JsScoreStore {
    pub fn new(backend: JsValue) -> Self {
        Self {
            backend,
            listeners: RefCell::new(Vec::new()),
        }
    }

    fn method(&self, name: &str) -> Result<Function, StoreError> {
        let value = Reflect::get(&self.backend, &JsValue::from_str(name))
            .map_err(|err| StoreError::Unavailable(describe(&err)))?;
        value
            .dyn_into::<Function>()
            .map_err(|_| StoreError::Unavailable(format!("backend has no `{}` function", name)))
    }
}

impl ScoreStore for JsScoreStore {
    fn write_if_greater_or_equal(&self, key: &str, value: u32, done: WriteDone) {
        let pending = Pending::new(done);
        let function = match self.method("writeIfGreaterOrEqual") {
            Ok(function) => function,
            Err(err) => return pending.finish(Err(err)),
        };
        let reply = pending.share();
        let callback = Closure::once_into_js(move |error: JsValue, committed: JsValue| {
            if is_error(&error) {
                reply.finish(Err(StoreError::Unavailable(describe(&error))));
            } else {
                reply.finish(Ok(committed.as_bool().unwrap_or(false)));
            }
        });
        let call = function.call3(
            &self.backend,
            &JsValue::from_str(key),
            &JsValue::from(value),
            &callback,
        );
        if let Err(err) = call {
            pending.finish(Err(StoreError::Unavailable(describe(&err))));
        }
    }

    fn read_once(&self, key: &str, done: ReadDone) {
        let pending = Pending::new(done);
        let function = match self.method("readOnce") {
            Ok(function) => function,
            Err(err) => return pending.finish(Err(err)),
        };
        let reply = pending.share();
        let callback = Closure::once_into_js(move |error: JsValue, value: JsValue| {
            let result = if is_error(&error) {
                Err(StoreError::Unavailable(describe(&error)))
            } else if value.is_null() || value.is_undefined() {
                Ok(None)
            } else {
                match value.as_f64() {
                    Some(score) if score >= 0.0 => Ok(Some(score as u32)),
                    _ => Err(StoreError::Malformed(describe(&value))),
                }
            };
            reply.finish(result);
        });
        if let Err(err) = function.call2(&self.backend, &JsValue::from_str(key), &callback) {
            pending.finish(Err(StoreError::Unavailable(describe(&err))));
        }
    }

    fn set_rank(&self, key: &str, rank: i64) {
        let result = self.method("setRank").and_then(|function| {
            function
                .call2(&self.backend, &JsValue::from_str(key), &JsValue::from_f64(rank as f64))
                .map_err(|err| StoreError::Unavailable(describe(&err)))
        });
        if let Err(err) = result {
            log::warn!("setRank({}) failed: {}", key, err);
        }
    }

    fn subscribe_top_n(&self, n: usize, mut listener: TopListener) {
        let function = match self.method("subscribeTopN") {
            Ok(function) => function,
            Err(err) => {
                log::warn!("leaderboard unavailable: {}", err);
                return;
            }
        };
        let closure = Closure::<dyn FnMut(JsValue)>::new(move |entries: JsValue| {
            let json = match JSON::stringify(&entries) {
                Ok(json) => String::from(json),
                Err(err) => {
                    log::warn!("unreadable leaderboard update: {}", describe(&err));
                    return;
                }
            };
            match serde_json::from_str::<Vec<HighscoreEntry>>(&json) {
                Ok(top) => listener(&top),
                Err(err) => log::warn!("malformed leaderboard update: {}", err),
            }
        });
        let call = function.call2(&self.backend, &JsValue::from(n as u32), closure.as_ref());
        if let Err(err) = call {
            log::warn!("subscribeTopN failed: {}", describe(&err));
            return;
        }
        self.listeners.borrow_mut().push(closure);
    }
}
