//! Bindings exporting the conversions to JavaScript. They work on real
//! JavaScript functions and return real JavaScript promises, following the
//! same rules as the rest of the crate.
//!
//! ```js
//! import { promisify, all } from "promisify";
//! import fs from "fs";
//!
//! const readFile = promisify(fs.readFile);
//! const { stat, statSync } = all(fs);
//! ```

use crate::{convention::Convention, error::Error, helpers};
use js_sys::{Array, Function, Object, Promise, Reflect, TypeError};
use wasm_bindgen::{closure::Closure, prelude::wasm_bindgen, JsCast, JsValue};

#[wasm_bindgen(inline_js = "export function variadic(handler) {
    return function (...args) { return handler(this, args); };
}")]
extern "C" {
    fn variadic(handler: &Function) -> Function;
}

fn type_error(error: Error) -> JsValue {
    TypeError::new(&error.to_string()).into()
}

fn kind_of(value: &JsValue) -> String {
    if value.is_null() {
        String::from("null")
    } else if Array::is_array(value) {
        String::from("array")
    } else {
        value.js_typeof().as_string().unwrap_or_default()
    }
}

/// Plain objects are created by literals, `new Object()` or
/// `Object.create(null)`: their prototype is `Object.prototype` or nothing.
fn is_plain_object(value: &JsValue) -> bool {
    if !value.is_object() {
        return false;
    }
    let prototype = Object::get_prototype_of(value);
    prototype.is_null()
        || Object::is(&prototype, &Object::get_prototype_of(&Object::new()))
}

/// Wraps a callback-style JavaScript function into one returning a promise.
/// A `context` other than `null` or `undefined` is always used as receiver.
#[wasm_bindgen(js_name = "promisify")]
pub fn wrap(target: JsValue, context: JsValue) -> Result<Function, JsValue> {
    let target: Function = target.dyn_into().map_err(|other| {
        type_error(Error::expected_function(&kind_of(&other)))
    })?;
    let name: JsValue = target.name().into();

    let handler = Closure::wrap(Box::new(move |this: JsValue, args: Array| {
        let receiver = if context.is_null() || context.is_undefined() {
            this
        } else {
            context.clone()
        };
        invoke(&target, &receiver, &args)
    }) as Box<dyn FnMut(JsValue, Array) -> Promise>)
    .into_js_value();

    let wrapped = variadic(handler.unchecked_ref());
    rename(&wrapped, &name);
    Ok(wrapped)
}

/// Overrides the read-only `name` property of a function.
fn rename(function: &JsValue, name: &JsValue) {
    let descriptor = Object::new();
    if Reflect::set(&descriptor, &"value".into(), name).is_ok() {
        Object::define_property(
            function.unchecked_ref::<Object>(),
            &"name".into(),
            &descriptor,
        );
    }
}

fn invoke(target: &Function, receiver: &JsValue, args: &Array) -> Promise {
    Promise::new(&mut |resolve: Function, reject: Function| {
        let fulfill = completion(resolve, reject.clone());
        args.push(&fulfill);
        if let Err(thrown) = target.apply(receiver, args) {
            let _ = reject.call1(&JsValue::UNDEFINED, &thrown);
        }
    })
}

fn completion(resolve: Function, reject: Function) -> JsValue {
    let mut settle = Some((resolve, reject));
    let fulfill = Closure::wrap(Box::new(move |error: JsValue, result: JsValue| {
        let (resolve, reject) = match settle.take() {
            Some(functions) => functions,
            None => return,
        };
        let outcome = if error.is_null() || error.is_undefined() {
            resolve.call1(&JsValue::UNDEFINED, &result)
        } else {
            reject.call1(&JsValue::UNDEFINED, &error)
        };
        if outcome.is_err() {
            log::warn!("failed to settle promise");
        }
    }) as Box<dyn FnMut(JsValue, JsValue)>)
    .into_js_value();

    rename(&fulfill, &"fulfill".into());
    fulfill
}

fn names(list: JsValue) -> Result<Vec<String>, JsValue> {
    if !Array::is_array(&list) {
        return Err(type_error(Error::expected_list(&kind_of(&list))));
    }
    let elements: Vec<JsValue> = list.unchecked_into::<Array>().iter().collect();
    if !helpers::is_array_of(&elements, |element, _, _| element.is_string()) {
        return Err(type_error(Error::expected_names()));
    }
    Ok(elements.iter().filter_map(JsValue::as_string).collect())
}

fn convert<S>(
    targets: JsValue,
    context: JsValue,
    selected: S,
) -> Result<Object, JsValue>
where
    S: Fn(&str) -> bool,
{
    if !is_plain_object(&targets) {
        return Err(type_error(Error::expected_targets(&kind_of(&targets))));
    }
    let convention = Convention::default();
    let converted = Object::new();

    for entry in Object::entries(targets.unchecked_ref()).iter() {
        let entry: Array = entry.unchecked_into();
        let (key, target) = (entry.get(0), entry.get(1));
        let name = key.as_string().unwrap_or_default();
        let value = if convention.excludes(&name) || !selected(&name) {
            target
        } else {
            wrap(target, context.clone())?.into()
        };
        Reflect::set(&converted, &key, &value)?;
    }

    Ok(converted)
}

/// Wraps every function of `targets`, except the ones whose name ends with
/// `Sync`, `Stream` or `Promise`.
#[wasm_bindgen(js_name = "all")]
pub fn all(targets: JsValue, context: JsValue) -> Result<Object, JsValue> {
    convert(targets, context, |_| true)
}

/// Wraps the functions of `targets` named in `list`, except the ones whose
/// name ends with `Sync`, `Stream` or `Promise`.
#[wasm_bindgen(js_name = "some")]
pub fn some(
    targets: JsValue,
    list: JsValue,
    context: JsValue,
) -> Result<Object, JsValue> {
    if !is_plain_object(&targets) {
        return Err(type_error(Error::expected_targets(&kind_of(&targets))));
    }
    let names = names(list)?;
    convert(targets, context, |name| names.iter().any(|listed| listed == name))
}

/// Wraps the functions of `targets` not named in `list`, except the ones
/// whose name ends with `Sync`, `Stream` or `Promise`.
#[wasm_bindgen(js_name = "except")]
pub fn except(
    targets: JsValue,
    list: JsValue,
    context: JsValue,
) -> Result<Object, JsValue> {
    if !is_plain_object(&targets) {
        return Err(type_error(Error::expected_targets(&kind_of(&targets))));
    }
    let names = names(list)?;
    convert(targets, context, |name| names.iter().all(|listed| listed != name))
}
