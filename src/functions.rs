//! Built-in math functions backing the default vocabulary.
//!
//! With the `libm` feature (the default) these delegate to the `libm` crate;
//! without it they fall back to the std float methods. Hosts that want other
//! numerics can skip [`Environment::with_defaults`](crate::Environment::with_defaults)
//! and register their own implementations.

#[cfg(all(feature = "libm", feature = "f32"))]
use libm::{
    ceilf as libm_ceil, cosf as libm_cos, floorf as libm_floor, powf as libm_pow,
    roundf as libm_round, sinf as libm_sin, sqrtf as libm_sqrt, tanf as libm_tan,
};

#[cfg(all(feature = "libm", not(feature = "f32")))]
use libm::{
    ceil as libm_ceil, cos as libm_cos, floor as libm_floor, pow as libm_pow,
    round as libm_round, sin as libm_sin, sqrt as libm_sqrt, tan as libm_tan,
};

use crate::Real;

pub fn sqrt(a: Real) -> Real {
    #[cfg(feature = "libm")]
    {
        libm_sqrt(a)
    }
    #[cfg(not(feature = "libm"))]
    {
        a.sqrt()
    }
}

pub fn abs(a: Real) -> Real {
    a.abs()
}

pub fn ceil(a: Real) -> Real {
    #[cfg(feature = "libm")]
    {
        libm_ceil(a)
    }
    #[cfg(not(feature = "libm"))]
    {
        a.ceil()
    }
}

pub fn floor(a: Real) -> Real {
    #[cfg(feature = "libm")]
    {
        libm_floor(a)
    }
    #[cfg(not(feature = "libm"))]
    {
        a.floor()
    }
}

pub fn round(a: Real) -> Real {
    #[cfg(feature = "libm")]
    {
        libm_round(a)
    }
    #[cfg(not(feature = "libm"))]
    {
        a.round()
    }
}

pub fn sin(a: Real) -> Real {
    #[cfg(feature = "libm")]
    {
        libm_sin(a)
    }
    #[cfg(not(feature = "libm"))]
    {
        a.sin()
    }
}

pub fn cos(a: Real) -> Real {
    #[cfg(feature = "libm")]
    {
        libm_cos(a)
    }
    #[cfg(not(feature = "libm"))]
    {
        a.cos()
    }
}

pub fn tan(a: Real) -> Real {
    #[cfg(feature = "libm")]
    {
        libm_tan(a)
    }
    #[cfg(not(feature = "libm"))]
    {
        a.tan()
    }
}

pub fn pow(a: Real, b: Real) -> Real {
    #[cfg(feature = "libm")]
    {
        libm_pow(a, b)
    }
    #[cfg(not(feature = "libm"))]
    {
        a.powf(b)
    }
}

pub fn min(a: Real, b: Real) -> Real {
    if a < b { a } else { b }
}

pub fn max(a: Real, b: Real) -> Real {
    if a > b { a } else { b }
}
