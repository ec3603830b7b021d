use futures::{executor::block_on, FutureExt};
use promisify::{
    deferred::Rejection,
    value::{Function, Mapping, Value},
    Promisify,
};
use std::{
    cell::{Cell, RefCell},
    rc::Rc,
};

fn callback_of(args: &[Value]) -> Function {
    args.last().and_then(Value::as_function).expect("no callback").clone()
}

/// Calls back with its first argument, or with an error when `reject` is set.
fn noop(reject: bool) -> Value {
    Function::new("noop", move |_, args| {
        let callback = callback_of(&args);
        if reject {
            return callback.invoke(vec![Value::from(
                "This function has been rejected cuz \"reject\" parameter is \
                 truthy.",
            )]);
        }
        let value =
            if args.len() > 1 { args[0].clone() } else { Value::Null };
        callback.invoke(vec![Value::Null, value])
    })
    .into()
}

/// Calls back with the receiver it was invoked with.
fn receiver_echo() -> Value {
    Function::new("receiverEcho", |this, args| {
        callback_of(&args).invoke(vec![Value::Null, this.clone()])
    })
    .into()
}

/// Keeps the callback for later instead of calling it.
fn deferring(slot: Rc<RefCell<Option<Function>>>) -> Value {
    Function::new("deferring", move |_, args| {
        *slot.borrow_mut() = Some(callback_of(&args));
        Value::Undefined
    })
    .into()
}

#[test]
fn returns_promise() {
    let noop = promisify::wrap(&noop(false), None).unwrap();
    assert!(noop.invoke(vec![]).is_promise());
}

#[test]
fn keeps_target_name() {
    let noop = promisify::wrap(&noop(false), None).unwrap();
    assert_eq!(noop.name(), "noop");
}

#[test]
fn passes_fulfill_as_last_argument() {
    let calls = Rc::new(RefCell::new(Vec::new()));
    let spy = {
        let calls = calls.clone();
        Function::new("spy", move |_, args| {
            calls.borrow_mut().push(args.clone());
            callback_of(&args).invoke(vec![Value::Null])
        })
    };

    let callee = promisify::wrap(&spy.into(), None).unwrap();
    let promise = callee
        .invoke(vec![Value::from(
            "I beat Twilight Sparkle and all I got was this lousy t-shirt.",
        )])
        .into_promise()
        .unwrap();
    block_on(promise).unwrap();

    let calls = calls.borrow();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].len(), 2);
    let fulfill = calls[0][1].as_function().expect("fulfill is a function");
    assert!(!fulfill.name().is_empty());
    assert_eq!(fulfill.name(), "fulfill");
}

#[test]
fn resolves_given_value() {
    let value = Value::from("It was a dark and stormy night");
    let noop = promisify::wrap(&noop(false), None).unwrap();
    let promise = noop.invoke(vec![value.clone()]).into_promise().unwrap();
    assert_eq!(block_on(promise), Ok(value));
}

#[test]
fn rejects_with_callback_error() {
    let noop = promisify::wrap(&noop(true), None).unwrap();
    let promise = noop.invoke(vec![]).into_promise().unwrap();
    let rejection = block_on(promise).unwrap_err();
    let error = rejection.failure().expect("rejected by the target");
    assert!(error.as_str().unwrap().starts_with("This function has been"));
}

#[test]
fn only_nullish_errors_fulfill() {
    let falsy_error = Function::new("falsyError", |_, args| {
        callback_of(&args).invoke(vec![Value::from(0), Value::from("result")])
    });
    let undefined_error = Function::new("undefinedError", |_, args| {
        callback_of(&args).invoke(vec![Value::Undefined, Value::from(5)])
    });
    let no_arguments = Function::new("noArguments", |_, args| {
        callback_of(&args).invoke(vec![])
    });

    let falsy_error = promisify::wrap(&falsy_error.into(), None).unwrap();
    let promise = falsy_error.invoke(vec![]).into_promise().unwrap();
    assert_eq!(block_on(promise), Err(Rejection::Failed(Value::from(0))));

    let undefined_error =
        promisify::wrap(&undefined_error.into(), None).unwrap();
    let promise = undefined_error.invoke(vec![]).into_promise().unwrap();
    assert_eq!(block_on(promise), Ok(Value::from(5)));

    let no_arguments = promisify::wrap(&no_arguments.into(), None).unwrap();
    let promise = no_arguments.invoke(vec![]).into_promise().unwrap();
    assert_eq!(block_on(promise), Ok(Value::Undefined));
}

#[test]
fn invokes_with_given_context() {
    let instance: Mapping = [("kind", "NoopClass")].into_iter().collect();
    let instance = Value::from(instance);

    let target = promisify::wrap(&receiver_echo(), Some(&instance)).unwrap();
    let promise = target.invoke(vec![]).into_promise().unwrap();
    assert_eq!(block_on(promise), Ok(instance));
}

#[test]
fn context_wins_over_call_receiver() {
    let context = Value::from("context");
    let target = Promisify::new()
        .context(context.clone())
        .wrap(&receiver_echo())
        .unwrap();
    let promise = target
        .call(&Value::from("receiver"), vec![])
        .into_promise()
        .unwrap();
    assert_eq!(block_on(promise), Ok(context));
}

#[test]
fn uses_call_receiver_without_context() {
    let target = promisify::wrap(&receiver_echo(), None).unwrap();

    let promise =
        target.call(&Value::from("first"), vec![]).into_promise().unwrap();
    assert_eq!(block_on(promise), Ok(Value::from("first")));

    let promise =
        target.call(&Value::from("second"), vec![]).into_promise().unwrap();
    assert_eq!(block_on(promise), Ok(Value::from("second")));
}

#[test]
fn nullish_context_uses_call_receiver() {
    for context in [Value::Null, Value::Undefined] {
        let target = promisify::wrap(&receiver_echo(), Some(&context)).unwrap();
        let promise = target
            .call(&Value::from("receiver"), vec![])
            .into_promise()
            .unwrap();
        assert_eq!(block_on(promise), Ok(Value::from("receiver")));

        let target = Promisify::new()
            .context(context)
            .wrap(&receiver_echo())
            .unwrap();
        let promise = target
            .call(&Value::from("receiver"), vec![])
            .into_promise()
            .unwrap();
        assert_eq!(block_on(promise), Ok(Value::from("receiver")));
    }
}

#[test]
fn throws_when_target_is_not_a_function() {
    let error =
        promisify::wrap(&Value::from("Oops! That's totally not a function"), None)
            .unwrap_err();
    assert!(error.is_invalid_argument());
    assert_eq!(error.to_string(), "Expected target function. Received string");

    let error = promisify::wrap(&Value::Null, None).unwrap_err();
    assert_eq!(error.to_string(), "Expected target function. Received null");

    let boxed = Value::boxed(Function::anonymous(|_, _| Value::Undefined));
    let error = promisify::wrap(&boxed, None).unwrap_err();
    assert_eq!(error.to_string(), "Expected target function. Received object");
}

#[test]
fn invokes_target_before_returning() {
    let slot = Rc::new(RefCell::new(None));
    let target = promisify::wrap(&deferring(slot.clone()), None).unwrap();

    let promise = target.invoke(vec![]).into_promise().unwrap();
    assert!(slot.borrow().is_some());
    assert!(promise.clone().now_or_never().is_none());

    let fulfill = slot.borrow_mut().take().unwrap();
    fulfill.invoke(vec![Value::Null, Value::from("later")]);
    assert_eq!(promise.now_or_never(), Some(Ok(Value::from("later"))));
}

#[test]
fn first_settlement_wins() {
    let twice = Function::new("twice", |_, args| {
        let callback = callback_of(&args);
        callback.invoke(vec![Value::Null, Value::from("first")]);
        callback.invoke(vec![Value::from("second")])
    });
    let twice = promisify::wrap(&twice.into(), None).unwrap();
    let promise = twice.invoke(vec![]).into_promise().unwrap();
    assert_eq!(block_on(promise), Ok(Value::from("first")));
}

#[test]
fn panicking_target_rejects() {
    let boom = Function::new("boom", |_, _| panic!("kaboom"));
    let boom = promisify::wrap(&boom.into(), None).unwrap();
    let promise = boom.invoke(vec![]).into_promise().unwrap();
    assert_eq!(
        block_on(promise),
        Err(Rejection::Panicked(String::from("kaboom")))
    );
}

#[test]
fn dropped_callback_abandons() {
    let forgetful = Function::new("forgetful", |_, _| Value::Undefined);
    let forgetful = promisify::wrap(&forgetful.into(), None).unwrap();
    let promise = forgetful.invoke(vec![]).into_promise().unwrap();
    assert!(block_on(promise).unwrap_err().is_abandoned());
}

#[test]
fn promise_clones_share_outcome() {
    let noop = promisify::wrap(&noop(false), None).unwrap();
    let promise = noop.invoke(vec![Value::from(7)]).into_promise().unwrap();
    let clone = promise.clone();
    assert_eq!(Value::from(promise.clone()), Value::from(clone.clone()));
    assert_eq!(block_on(promise), Ok(Value::from(7)));
    assert_eq!(block_on(clone), Ok(Value::from(7)));
}

#[test]
fn calls_are_independent() {
    let slot = Rc::new(RefCell::new(None));
    let calls = Rc::new(Cell::new(0));
    let target = {
        let calls = calls.clone();
        let inner = deferring(slot.clone());
        Function::new("counted", move |this, args| {
            calls.set(calls.get() + 1);
            inner.as_function().unwrap().call(this, args)
        })
    };
    let target = promisify::wrap(&target.into(), None).unwrap();

    let first = target.invoke(vec![]).into_promise().unwrap();
    let first_callback = slot.borrow_mut().take().unwrap();
    let second = target.invoke(vec![]).into_promise().unwrap();
    let second_callback = slot.borrow_mut().take().unwrap();
    assert_eq!(calls.get(), 2);
    assert_ne!(Value::from(first.clone()), Value::from(second.clone()));

    second_callback.invoke(vec![Value::Null, Value::from(2)]);
    assert!(first.clone().now_or_never().is_none());
    first_callback.invoke(vec![Value::Null, Value::from(1)]);

    assert_eq!(block_on(first), Ok(Value::from(1)));
    assert_eq!(block_on(second), Ok(Value::from(2)));
}
