//! The browser preview evaluator must agree with the server evaluator.
//!
//! `static/js/evaluator.js` runs inside an embedded JavaScript engine and every
//! result is compared bit-for-bit with `calculations::operation::evaluate`.

use boa_engine::{Context, JsValue, Source};
use calcvault::calculations::operation::{evaluate, Operation};

const EVALUATOR_JS: &str = include_str!("../static/js/evaluator.js");

const OPERANDS: &[f64] = &[
    0.0,
    -0.0,
    1.0,
    -1.0,
    0.1,
    0.2,
    3.0,
    -7.5,
    1e-300,
    5e-324,
    123_456_789.123_456_79,
    9_007_199_254_740_993.0,
    1e308,
    -1e308,
    f64::MAX,
    f64::MIN,
    f64::MIN_POSITIVE,
];

fn context() -> Context {
    let mut ctx = Context::default();
    ctx.eval(Source::from_bytes(EVALUATOR_JS))
        .expect("evaluator.js loads");
    ctx
}

/// Calls `evaluate` in the engine; a thrown error comes back as its message.
fn js_evaluate(ctx: &mut Context, a: f64, b: f64, op: &str) -> Result<f64, String> {
    // `{:?}` prints the shortest round-tripping literal, including `-0.0`
    let call = format!(
        "(() => {{ try {{ return evaluate({:?}, {:?}, {:?}); }} catch (e) {{ return 'error:' + e.message; }} }})()",
        a, b, op
    );
    let value: JsValue = ctx
        .eval(Source::from_bytes(&call))
        .unwrap_or_else(|e| panic!("{} failed: {:?}", call, e));
    if let Some(n) = value.as_number() {
        return Ok(n);
    }
    let text = value
        .as_string()
        .map(|s| s.to_std_string_escaped())
        .unwrap_or_else(|| panic!("{} returned {:?}", call, value));
    Err(text.trim_start_matches("error:").to_string())
}

#[test]
fn preview_matches_server_bit_for_bit() {
    let mut ctx = context();
    let mut compared = 0;

    for &a in OPERANDS {
        for &b in OPERANDS {
            for op in Operation::ALL {
                let server = evaluate(a, b, op).map_err(|e| e.to_string());
                let browser = js_evaluate(&mut ctx, a, b, op.as_str());
                match (&server, &browser) {
                    (Ok(s), Ok(c)) => assert_eq!(
                        s.to_bits(),
                        c.to_bits(),
                        "{:?} {} {:?}: server {:?}, browser {:?}",
                        a,
                        op,
                        b,
                        s,
                        c
                    ),
                    _ => assert_eq!(server, browser, "{:?} {} {:?}", a, op, b),
                }
                compared += 1;
            }
        }
    }
    assert_eq!(compared, OPERANDS.len() * OPERANDS.len() * Operation::ALL.len());
}

#[test]
fn signed_zero_survives_in_both() {
    let mut ctx = context();
    let cases = [
        (-0.0, -0.0, Operation::Add),
        (0.0, -0.0, Operation::Sub),
        (-0.0, 5.0, Operation::Multiply),
        (-0.0, 3.0, Operation::Divide),
    ];
    for (a, b, op) in cases {
        let server = evaluate(a, b, op).unwrap();
        let browser = js_evaluate(&mut ctx, a, b, op.as_str()).unwrap();
        assert_eq!(server.to_bits(), browser.to_bits(), "{:?} {} {:?}", a, op, b);
    }
    assert!(js_evaluate(&mut ctx, -0.0, -0.0, "ADD").unwrap().is_sign_negative());
}

#[test]
fn overflow_reaches_infinity_in_both() {
    let mut ctx = context();
    let server = evaluate(1e308, 1e308, Operation::Add).unwrap();
    let browser = js_evaluate(&mut ctx, 1e308, 1e308, "ADD").unwrap();
    assert!(server.is_infinite() && server.is_sign_positive());
    assert_eq!(server.to_bits(), browser.to_bits());

    let browser = js_evaluate(&mut ctx, -1e308, 10.0, "MULTIPLY").unwrap();
    assert_eq!(browser, f64::NEG_INFINITY);
}

#[test]
fn divide_by_either_zero_is_refused_with_the_same_message() {
    let mut ctx = context();
    for zero in [0.0, -0.0] {
        let server = evaluate(10.0, zero, Operation::Divide).unwrap_err().to_string();
        let browser = js_evaluate(&mut ctx, 10.0, zero, "DIVIDE").unwrap_err();
        assert_eq!(server, browser);
        assert_eq!(browser, "Division by zero is not allowed");
    }
}

#[test]
fn unknown_operation_is_refused_with_the_same_message() {
    let mut ctx = context();
    let server = "POWER".parse::<Operation>().unwrap_err().to_string();
    let browser = js_evaluate(&mut ctx, 2.0, 3.0, "POWER").unwrap_err();
    assert_eq!(server, browser);
}
