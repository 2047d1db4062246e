//! Built-in VIM drivers.
//!
//! Both drivers validate the VIM description handed to them and report the
//! result; talking to the VIM itself is left to the NFVO service.
use extapi_core::driver::{Driver, DriverError};
use serde_json::{Value, json};

/// `vim_obj` from the keyword arguments, or an invocation error naming `method`
fn vim_obj<'a>(driver_type: &str, method: &str, kwargs: &'a Value) -> Result<&'a Value, DriverError> {
    kwargs
        .get("vim_obj")
        .filter(|v| v.is_object())
        .ok_or_else(|| DriverError::Invocation {
            driver_type: driver_type.to_string(),
            method: method.to_string(),
            message: "missing 'vim_obj'".to_string(),
        })
}

fn required_str<'a>(
    driver_type: &str,
    method: &str,
    obj: &'a Value,
    key: &str,
) -> Result<&'a str, DriverError> {
    obj.get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| DriverError::Invocation {
            driver_type: driver_type.to_string(),
            method: method.to_string(),
            message: format!("vim_obj has no '{}'", key),
        })
}

#[derive(Debug, Default)]
pub struct OpenstackDriver;

impl Driver for OpenstackDriver {
    fn driver_type(&self) -> &str {
        "openstack"
    }

    fn name(&self) -> &str {
        "OpenStack VIM"
    }

    fn description(&self) -> &str {
        "OpenStack VIM driver"
    }

    fn invoke(&self, method: &str, kwargs: &Value) -> Result<Value, DriverError> {
        match method {
            "register_vim" => {
                let obj = vim_obj(self.driver_type(), method, kwargs)?;
                let auth_url = required_str(self.driver_type(), method, obj, "auth_url")?;
                let auth_url = auth_url.trim_end_matches('/');
                let auth_url = if auth_url.ends_with("/v3") {
                    auth_url.to_string()
                } else {
                    format!("{}/v3", auth_url)
                };
                log::debug!("Registering OpenStack VIM at {}", auth_url);
                Ok(json!({ "auth_url": auth_url, "status": "REACHABLE" }))
            }
            "deregister_vim" => {
                let obj = vim_obj(self.driver_type(), method, kwargs)?;
                let id = required_str(self.driver_type(), method, obj, "id")?;
                Ok(json!({ "id": id, "status": "DEREGISTERED" }))
            }
            "get_type" => Ok(json!(self.driver_type())),
            "get_name" => Ok(json!(self.name())),
            "get_description" => Ok(json!(self.description())),
            _ => Err(DriverError::UnknownMethod {
                driver_type: self.driver_type().to_string(),
                method: method.to_string(),
            }),
        }
    }
}

#[derive(Debug, Default)]
pub struct KubernetesDriver;

impl Driver for KubernetesDriver {
    fn driver_type(&self) -> &str {
        "kubernetes"
    }

    fn name(&self) -> &str {
        "Kubernetes VIM"
    }

    fn description(&self) -> &str {
        "Kubernetes VIM driver"
    }

    fn invoke(&self, method: &str, kwargs: &Value) -> Result<Value, DriverError> {
        match method {
            "register_vim" => {
                let obj = vim_obj(self.driver_type(), method, kwargs)?;
                let auth_url = required_str(self.driver_type(), method, obj, "auth_url")?;
                if !auth_url.starts_with("https://") {
                    return Err(DriverError::Invocation {
                        driver_type: self.driver_type().to_string(),
                        method: method.to_string(),
                        message: format!("auth_url '{}' must use https", auth_url),
                    });
                }
                Ok(json!({ "auth_url": auth_url, "status": "REACHABLE" }))
            }
            "deregister_vim" => {
                let obj = vim_obj(self.driver_type(), method, kwargs)?;
                let id = required_str(self.driver_type(), method, obj, "id")?;
                Ok(json!({ "id": id, "status": "DEREGISTERED" }))
            }
            "get_type" => Ok(json!(self.driver_type())),
            "get_name" => Ok(json!(self.name())),
            "get_description" => Ok(json!(self.description())),
            _ => Err(DriverError::UnknownMethod {
                driver_type: self.driver_type().to_string(),
                method: method.to_string(),
            }),
        }
    }
}
