//! Named host operations exposed to the isolated front-end context.
//!
//! The registry is filled once at startup and is read-only afterwards, so concurrent
//! invocations of different names never interact. A handler failure is returned to the one
//! caller that triggered it, with the handler's own message.

use std::{collections::BTreeMap, fmt, sync::Arc};

use serde_json::Value;
use thiserror::Error;

pub const DEFAULT_BRIDGE_NAMESPACE: &str = "api";

pub type CapabilityHandler<C> = Arc<dyn Fn(Value, &C) -> Result<Value, String> + Send + Sync>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BridgeError {
    #[error("invalid capability name `{name}`")]
    InvalidName { name: String },
    #[error("capability `{name}` is already registered")]
    DuplicateCapability { name: String },
    #[error("unknown capability `{name}`")]
    UnknownCapability { name: String },
    #[error("{message}")]
    Handler { name: String, message: String },
}

fn is_valid_capability_name(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    (first.is_ascii_alphabetic() || first == '_' || first == '$')
        && chars.all(|ch| ch.is_ascii_alphanumeric() || ch == '_' || ch == '$')
}

pub struct CapabilityRegistry<C> {
    handlers: BTreeMap<String, CapabilityHandler<C>>,
}

impl<C> Default for CapabilityRegistry<C> {
    fn default() -> Self {
        Self {
            handlers: BTreeMap::new(),
        }
    }
}

impl<C> fmt::Debug for CapabilityRegistry<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CapabilityRegistry")
            .field("names", &self.names())
            .finish()
    }
}

impl<C> CapabilityRegistry<C> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `handler` under `name`. Names must be JavaScript identifiers and unique.
    pub fn register<F>(&mut self, name: impl Into<String>, handler: F) -> Result<(), BridgeError>
    where
        F: Fn(Value, &C) -> Result<Value, String> + Send + Sync + 'static,
    {
        let name = name.into();
        if !is_valid_capability_name(&name) {
            return Err(BridgeError::InvalidName { name });
        }
        if self.handlers.contains_key(&name) {
            return Err(BridgeError::DuplicateCapability { name });
        }

        self.handlers.insert(name, Arc::new(handler));
        Ok(())
    }

    pub fn invoke(&self, name: &str, payload: Value, context: &C) -> Result<Value, BridgeError> {
        let handler = self
            .handlers
            .get(name)
            .ok_or_else(|| BridgeError::UnknownCapability {
                name: name.to_string(),
            })?;

        handler(payload, context).map_err(|message| BridgeError::Handler {
            name: name.to_string(),
            message,
        })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    pub fn names(&self) -> Vec<&str> {
        self.handlers.keys().map(String::as_str).collect()
    }

    /// Renders the initialization script that defines `window.<namespace>` with one async
    /// method per capability, each forwarding to the IPC `command`.
    pub fn bridge_script(&self, namespace: &str, command: &str) -> String {
        let quote = |raw: &str| serde_json::to_string(raw).unwrap_or_else(|_| "\"\"".to_string());

        let methods = self
            .names()
            .into_iter()
            .map(|name| {
                let quoted = quote(name);
                format!("    {quoted}: (payload) => invoke({quoted}, payload),\n")
            })
            .collect::<String>();

        format!(
            r#"(function () {{
  if (!window.__TAURI_INTERNALS__) {{
    return;
  }}
  const invoke = (name, payload) =>
    window.__TAURI_INTERNALS__.invoke({command}, {{
      name,
      payload: payload === undefined ? null : payload,
    }});
  const api = Object.freeze({{
{methods}  }});
  Object.defineProperty(window, {namespace}, {{
    value: api,
    writable: false,
    configurable: false,
  }});
}})();
"#,
            command = quote(command),
            namespace = quote(namespace),
        )
    }
}

#[cfg(test)]
mod tests {
    use std::{sync::Barrier, thread};

    use serde_json::json;

    use super::*;

    struct TestContext {
        window_title: &'static str,
    }

    fn registry() -> CapabilityRegistry<TestContext> {
        let mut registry = CapabilityRegistry::new();
        registry
            .register("hello", |_, _| Ok(json!("world")))
            .unwrap();
        registry
            .register("windowTitle", |_, context: &TestContext| {
                Ok(json!(context.window_title))
            })
            .unwrap();
        registry
            .register("divide", |payload, _| {
                let numerator = payload["a"].as_f64().ok_or("missing a")?;
                let denominator = payload["b"].as_f64().ok_or("missing b")?;
                if denominator == 0.0 {
                    return Err("division by zero".to_string());
                }
                Ok(json!(numerator / denominator))
            })
            .unwrap();
        registry
    }

    #[test]
    fn hello_returns_world() {
        let context = TestContext { window_title: "App" };
        assert_eq!(
            registry().invoke("hello", Value::Null, &context),
            Ok(json!("world"))
        );
    }

    #[test]
    fn handlers_read_injected_context() {
        let context = TestContext { window_title: "App" };
        assert_eq!(
            registry().invoke("windowTitle", Value::Null, &context),
            Ok(json!("App"))
        );
    }

    #[test]
    fn register_rejects_duplicates_and_invalid_names() {
        let mut registry = registry();
        assert_eq!(
            registry.register("hello", |_, _| Ok(json!("again"))),
            Err(BridgeError::DuplicateCapability {
                name: "hello".to_string()
            })
        );
        for name in ["", "1st", "has space", "dot.name"] {
            assert!(
                matches!(
                    registry.register(name, |_, _| Ok(Value::Null)),
                    Err(BridgeError::InvalidName { .. })
                ),
                "name={name:?}"
            );
        }

        let context = TestContext { window_title: "App" };
        assert_eq!(
            registry.invoke("hello", Value::Null, &context),
            Ok(json!("world"))
        );
    }

    #[test]
    fn invoke_unknown_name_fails() {
        let context = TestContext { window_title: "App" };
        assert_eq!(
            registry().invoke("missing", Value::Null, &context),
            Err(BridgeError::UnknownCapability {
                name: "missing".to_string()
            })
        );
    }

    #[test]
    fn handler_failure_keeps_message_and_spares_concurrent_calls() {
        let registry = registry();
        let context = TestContext { window_title: "App" };
        let barrier = Barrier::new(3);

        let (failed, divided, greeted) = thread::scope(|scope| {
            let failed = scope.spawn(|| {
                barrier.wait();
                registry.invoke("divide", json!({ "a": 1, "b": 0 }), &context)
            });
            let divided = scope.spawn(|| {
                barrier.wait();
                registry.invoke("divide", json!({ "a": 9, "b": 3 }), &context)
            });
            let greeted = scope.spawn(|| {
                barrier.wait();
                registry.invoke("hello", Value::Null, &context)
            });
            (
                failed.join().unwrap(),
                divided.join().unwrap(),
                greeted.join().unwrap(),
            )
        });

        let error = failed.unwrap_err();
        assert_eq!(error.to_string(), "division by zero");
        assert_eq!(divided, Ok(json!(3.0)));
        assert_eq!(greeted, Ok(json!("world")));
    }

    #[test]
    fn bridge_script_lists_every_capability() {
        let script = registry().bridge_script(DEFAULT_BRIDGE_NAMESPACE, "desktop_bridge_invoke");
        assert!(script.contains(r#""divide": (payload) => invoke("divide", payload),"#));
        assert!(script.contains(r#""hello": (payload) => invoke("hello", payload),"#));
        assert!(script.contains(r#"invoke("desktop_bridge_invoke""#));
        assert!(script.contains(r#"Object.defineProperty(window, "api""#));
    }

    #[test]
    fn names_are_sorted() {
        assert_eq!(registry().names(), vec!["divide", "hello", "windowTitle"]);
    }
}
