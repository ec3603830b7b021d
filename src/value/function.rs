use crate::value::Value;
use std::{fmt, rc::Rc};

type Body = dyn Fn(&Value, Vec<Value>) -> Value;

struct Inner {
    name: String,
    body: Box<Body>,
}

/// A named function over dynamic values. It receives the receiver (`this`)
/// of the call and its positional arguments.
///
/// Cloning a function is cheap and yields the same function: clones compare
/// equal by identity.
#[derive(Clone)]
pub struct Function {
    inner: Rc<Inner>,
}

impl Function {
    /// Creates a function with the given name.
    ///
    /// # Examples
    ///
    /// ```
    /// use promisify::value::{Function, Value};
    ///
    /// let double = Function::new("double", |_this, args| match args.first() {
    ///     Some(Value::Number(number)) => Value::Number(number * 2.0),
    ///     _ => Value::Undefined,
    /// });
    ///
    /// assert_eq!(double.name(), "double");
    /// assert_eq!(double.invoke(vec![Value::from(21)]), Value::from(42));
    /// ```
    pub fn new<N, F>(name: N, body: F) -> Self
    where
        N: Into<String>,
        F: Fn(&Value, Vec<Value>) -> Value + 'static,
    {
        Self { inner: Rc::new(Inner { name: name.into(), body: Box::new(body) }) }
    }

    /// Creates a function without a name.
    pub fn anonymous<F>(body: F) -> Self
    where
        F: Fn(&Value, Vec<Value>) -> Value + 'static,
    {
        Self::new(String::new(), body)
    }

    /// The name this function was created with. Empty for anonymous functions.
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Calls this function with an explicit receiver.
    pub fn call(&self, this: &Value, args: Vec<Value>) -> Value {
        (self.inner.body)(this, args)
    }

    /// Calls this function without a receiver.
    pub fn invoke(&self, args: Vec<Value>) -> Value {
        self.call(&Value::Undefined, args)
    }

    /// Tests whether both handles refer to the same function.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for Function {
    fn fmt(&self, fmtr: &mut fmt::Formatter) -> fmt::Result {
        fmtr.debug_struct("Function").field("name", &self.name()).finish()
    }
}
