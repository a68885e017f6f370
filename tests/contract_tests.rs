mod common;

use common::{args, double, identity, non_empty, second_is_string};
use pretty_assertions::assert_eq;
use quackquack::annotation::{DecoratorContext, PropertyDescriptor};
use quackquack::{
    expect_duck, expect_quack, quackable, Callable, Declaration, Object, Phase, QuackError, Value,
};

#[test]
fn test_accepts_correctly_annotated_function() {
    let f = quackable("(i:number, j:string) => boolean")
        .unwrap()
        .annotate(&second_is_string());
    let checked = expect_quack("(i: number, j:string) => boolean", false)
        .unwrap()
        .apply(&f)
        .unwrap();

    assert_eq!(
        checked.call(args([Value::from(1), Value::from("ok")])).unwrap(),
        Value::Bool(true)
    );
    assert_eq!(
        checked.call(args([Value::from(2), Value::from("test")])).unwrap(),
        Value::Bool(true)
    );
}

#[test]
fn test_accepts_correctly_annotated_method() {
    let method = second_is_string();
    let annotator = quackable("(a:number, b:string) => boolean").unwrap();
    annotator
        .declare(Declaration::LegacyMethod {
            target: Object::new(),
            key: "test_fn".to_string(),
            descriptor: PropertyDescriptor::method(method.clone()),
        })
        .unwrap();
    let object = Object::new().with("test_fn", method.clone());

    let checked = expect_quack("(a:number, b:string) => boolean", false)
        .unwrap()
        .apply(object.method("test_fn").unwrap())
        .unwrap();
    assert!(checked.same_identity(&method));
    assert_eq!(
        object.call("test_fn", args([Value::from(1), Value::from("ok")])).unwrap(),
        Value::Bool(true)
    );
}

#[test]
fn test_wraps_and_validates_unannotated_function() {
    let f = Callable::new(|args| {
        Ok(Value::from(format!(
            "{}: {}",
            args[0].describe(),
            args[1].describe()
        )))
    });
    let wrapped = expect_quack("(i:number, j: number) => number", false)
        .unwrap()
        .apply(&f)
        .unwrap();

    let err = wrapped
        .call(args([Value::from("a"), Value::from(2)]))
        .unwrap_err();
    let validation = err.as_validation().expect("validation error");
    assert_eq!(validation.phase(), Phase::Arguments);
    assert_eq!(validation.positions(), vec![0]);

    // valid arguments, but the string return breaks the contract
    let err = wrapped
        .call(args([Value::from(1), Value::from(2)]))
        .unwrap_err();
    assert_eq!(err.as_validation().unwrap().phase(), Phase::Return);
}

#[test]
fn test_throws_on_mismatched_signature() {
    let f = quackable("(i:number) => number").unwrap().annotate(&identity());
    let err = expect_quack("(i:string) => number", false)
        .unwrap()
        .apply(&f)
        .unwrap_err();
    assert!(err
        .to_string()
        .starts_with("Function does not match expected quack"));

    let method = Callable::new(|_| Ok(Value::from(0)));
    quackable("(x: number, y: number) => number")
        .unwrap()
        .declare(Declaration::Method {
            method: method.clone().into(),
            context: DecoratorContext::method("test_fn"),
        })
        .unwrap();
    let err = expect_quack("(i:string) => number", true)
        .unwrap()
        .apply(&method)
        .unwrap_err();
    assert!(matches!(err, QuackError::SignatureMismatch { .. }));
}

#[test]
fn test_parameter_names_do_not_affect_compatibility() {
    let f = quackable("(a: number) => number").unwrap().annotate(&double());
    let checked = expect_quack("(x: number) => number", false)
        .unwrap()
        .apply(&f)
        .unwrap();
    assert!(checked.same_identity(&f));
}

#[test]
fn test_fast_path_skips_validation() {
    let f = quackable("(x: number) => number").unwrap().annotate(&identity());
    let checked = expect_quack("(x: number) => number", false)
        .unwrap()
        .apply(&f)
        .unwrap();
    // nothing checks the argument once the annotation matched
    assert_eq!(
        checked.call(args([Value::from("42")])).unwrap(),
        Value::from("42")
    );
}

#[test]
fn test_rebound_method_keeps_closure_state() {
    let base = 5.0;
    let add = quackable("(x:number)=>number")
        .unwrap()
        .annotate(&Callable::new(move |args| {
            Ok(Value::Number(args[0].as_number().unwrap_or(0.0) + base))
        }));
    let bound = add.rebind();
    let wrapped = expect_quack("(x:number)=>number", false)
        .unwrap()
        .apply(&bound)
        .unwrap();
    assert!(!wrapped.same_identity(&bound));
    assert_eq!(wrapped.call(args([Value::from(3)])).unwrap(), Value::Number(8.0));
}

#[tokio::test]
async fn test_wraps_async_unannotated_function() {
    let contract = expect_quack("async (x: number, y: string) => boolean", false).unwrap();
    let async_fn = Callable::asynchronous(|args: Vec<Value>| async move {
        let x = args[0].as_number().unwrap_or(0.0);
        Ok(Value::Bool(args[1].as_str().is_some() && x > 0.0))
    });
    let wrapped = contract.apply(&async_fn).unwrap();

    let ok = wrapped.call(args([Value::from(1), Value::from("ok")])).unwrap();
    assert_eq!(ok.as_promise().cloned().unwrap().await.unwrap(), Value::Bool(true));
    let bad = wrapped.call(args([Value::from(-1), Value::from("bad")])).unwrap();
    assert_eq!(bad.as_promise().cloned().unwrap().await.unwrap(), Value::Bool(false));

    let returns_number =
        contract.apply(&Callable::asynchronous(|_| async { Ok(Value::from(1)) })).unwrap();
    let pending = returns_number
        .call(args([Value::from(123), Value::from(123)]))
        .unwrap();
    let err = pending.as_promise().cloned().unwrap().await.unwrap_err();
    assert!(err.as_validation().is_some());
}

#[test]
fn test_duck_accepts_annotated_object() {
    let object = Object::new()
        .with("foo", quackable("(i:number) => number").unwrap().annotate(&double()))
        .with("bar", quackable("(i:string) => boolean").unwrap().annotate(&non_empty()));

    let ducked = expect_duck(
        [("foo", "(i:number) => number"), ("bar", "(i:string) => boolean")],
        false,
    )
    .unwrap()
    .apply(&object)
    .unwrap();

    assert_eq!(ducked.call("foo", args([Value::from(3)])).unwrap(), Value::Number(6.0));
    assert_eq!(ducked.call("bar", args([Value::from("hello")])).unwrap(), Value::Bool(true));
}

#[test]
fn test_duck_wraps_unannotated_methods() {
    let object = Object::new().with("foo", double()).with("bar", non_empty());
    let ducked = expect_duck(
        [("foo", "(i:number) => number"), ("bar", "(i:string) => boolean")],
        false,
    )
    .unwrap()
    .apply(&object)
    .unwrap();

    assert_eq!(ducked.call("foo", args([Value::from(3)])).unwrap(), Value::Number(6.0));
    assert_eq!(ducked.call("bar", args([Value::from("hello")])).unwrap(), Value::Bool(true));
    assert!(ducked.call("foo", args([Value::from("bad")])).is_err());
}

#[test]
fn test_strict_duck_rewraps_annotated_methods() {
    let object = Object::new()
        .with("foo", quackable("(i:number) => number").unwrap().annotate(&double()))
        .with("bar", quackable("(i:string) => boolean").unwrap().annotate(&non_empty()));
    let ducked = expect_duck(
        [("foo", "(i:number) => number"), ("bar", "(i:string) => boolean")],
        true,
    )
    .unwrap()
    .apply(&object)
    .unwrap();

    assert_eq!(ducked.call("foo", args([Value::from(3)])).unwrap(), Value::Number(6.0));
    assert!(ducked.call("foo", args([Value::from("bad")])).is_err());
    // the candidate itself is untouched
    assert_eq!(object.call("foo", args([Value::from("bad")])).unwrap(), Value::from("bad"));
}

#[test]
fn test_duck_missing_method_produces_nothing() {
    let err = expect_duck([("foo", "(i:number)=>number")], false)
        .unwrap()
        .apply(&Object::new().with("bar", double()))
        .unwrap_err();
    assert_eq!(err.to_string(), "Method foo is missing from the object.");
}

#[test]
fn test_duck_mismatch_aborts_whole_object() {
    let object = Object::new()
        .with("foo", double())
        .with("bar", quackable("(i:number) => boolean").unwrap().annotate(&non_empty()));
    let err = expect_duck(
        [("foo", "(i:number) => number"), ("bar", "(i:string) => boolean")],
        false,
    )
    .unwrap()
    .apply(&object)
    .unwrap_err();
    assert!(matches!(err, QuackError::SignatureMismatch { .. }));
}
