//! Math functions available to formulas
//!
//! Registered on top of Rhai's standard packages so the spellings produced
//! by the preprocessor resolve, and so results follow calculator rather than
//! programming conventions: `log` is the natural logarithm and `ceiling` is
//! spelled out.

use rhai::{Engine, FLOAT};

/// Register every formula function on `engine`
pub fn register_math_api(engine: &mut Engine) {
    // Trigonometry
    engine.register_fn("sin", |v: FLOAT| v.sin());
    engine.register_fn("cos", |v: FLOAT| v.cos());
    engine.register_fn("tan", |v: FLOAT| v.tan());
    engine.register_fn("asin", |v: FLOAT| v.asin());
    engine.register_fn("acos", |v: FLOAT| v.acos());
    engine.register_fn("atan", |v: FLOAT| v.atan());

    // Powers and logarithms
    engine.register_fn("sqrt", |v: FLOAT| v.sqrt());
    engine.register_fn("pow", |base: FLOAT, exponent: FLOAT| base.powf(exponent));
    engine.register_fn("exp", |v: FLOAT| v.exp());
    engine.register_fn("log", |v: FLOAT| v.ln());
    engine.register_fn("log", |v: FLOAT, base: FLOAT| v.log(base));
    engine.register_fn("ln", |v: FLOAT| v.ln());

    // Rounding and sign
    engine.register_fn("abs", |v: FLOAT| v.abs());
    engine.register_fn("floor", |v: FLOAT| v.floor());
    engine.register_fn("ceiling", |v: FLOAT| v.ceil());
    engine.register_fn("round", |v: FLOAT| v.round());
    engine.register_fn("sign", |v: FLOAT| {
        if v == 0.0 { 0.0 } else { v.signum() }
    });
    engine.register_fn("min", |a: FLOAT, b: FLOAT| a.min(b));
    engine.register_fn("max", |a: FLOAT, b: FLOAT| a.max(b));
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn eval(expr: &str) -> FLOAT {
        let mut engine = Engine::new();
        register_math_api(&mut engine);
        engine.eval_expression::<FLOAT>(expr).unwrap()
    }

    #[test]
    fn test_log_is_natural() {
        assert_relative_eq!(eval("log(exp(2.0))"), 2.0, epsilon = 1e-12);
        assert_relative_eq!(eval("log(8.0, 2.0)"), 3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_pow_and_ceiling() {
        assert_relative_eq!(eval("pow(2.0, 10.0)"), 1024.0);
        assert_relative_eq!(eval("ceiling(1.2)"), 2.0);
        assert_relative_eq!(eval("floor(-1.2)"), -2.0);
    }

    #[test]
    fn test_sign() {
        assert_relative_eq!(eval("sign(-3.0)"), -1.0);
        assert_relative_eq!(eval("sign(0.0)"), 0.0);
    }
}
