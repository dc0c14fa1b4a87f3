/* SPDX-License-Identifier: (Apache-2.0 OR MIT OR Zlib) */
/* Copyright © 2023 Violet Leonard */

/// A polynomial in `t`, highest power first.
#[derive(Clone, Copy, Debug)]
pub struct Polynomial<const N: usize> {
    pub coeffs: [f32; N],
}

macro_rules! one {
    ($x:tt) => {
        1
    };
}

macro_rules! poly_value {
    ($head:ident $($coeff:ident)*) => {
        impl Polynomial<{ 1 $(+ one!($coeff))* }> {
            pub fn value(&self, t: f32) -> f32 {
                let [mut $head, $($coeff,)*] = self.coeffs;
                $(
                    $head = $head * t + $coeff;
                )*
                $head
            }
        }
    };
}

poly_value! { a b c }
poly_value! { a b c d }

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_horner_evaluation() {
        // t^2 - 2t + 3
        let quad = Polynomial {
            coeffs: [1.0, -2.0, 3.0],
        };
        assert_eq!(quad.value(0.0), 3.0);
        assert_eq!(quad.value(2.0), 3.0);
        // 2t^3 + 1
        let cubic = Polynomial {
            coeffs: [2.0, 0.0, 0.0, 1.0],
        };
        assert_eq!(cubic.value(1.0), 3.0);
        assert_eq!(cubic.value(-1.0), -1.0);
    }
}
