use super::curve::CurveParams;
use crate::{errors::Error, math::BigInteger};

/// A point of a prime curve in affine coordinates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Point {
    /// The neutral element.
    Infinity,
    Affine { x: BigInteger, y: BigInteger },
}

impl Point {
    pub fn x(&self) -> Option<&BigInteger> {
        match self {
            Point::Infinity => None,
            Point::Affine { x, .. } => Some(x),
        }
    }

    pub fn y(&self) -> Option<&BigInteger> {
        match self {
            Point::Infinity => None,
            Point::Affine { y, .. } => Some(y),
        }
    }

    pub fn is_infinity(&self) -> bool {
        matches!(self, Point::Infinity)
    }
}

impl CurveParams {
    /// Whether `point` is a finite point with reduced coordinates satisfying the curve equation.
    pub fn contains(&self, point: &Point) -> bool {
        let Point::Affine { x, y } = point else {
            return false;
        };
        if *x >= self.p || *y >= self.p {
            return false;
        }
        self.equation_holds(x, y).unwrap_or(false)
    }

    fn equation_holds(&self, x: &BigInteger, y: &BigInteger) -> Result<bool, Error> {
        let p = &self.p;
        let lhs = y.mod_mul(y, p)?;
        let x3 = x.mod_mul(x, p)?.mod_mul(x, p)?;
        let rhs = x3.mod_add(&self.a.mod_mul(x, p)?, p)?.mod_add(&self.b, p)?;
        Ok(lhs == rhs)
    }

    /// Build a finite point, rejecting coordinates that are not on the curve.
    pub fn point(&self, x: BigInteger, y: BigInteger) -> Result<Point, Error> {
        let point = Point::Affine { x, y };
        if !self.contains(&point) {
            return Err(Error::invalid_key("point is not on the curve"));
        }
        Ok(point)
    }

    pub fn add(&self, lhs: &Point, rhs: &Point) -> Result<Point, Error> {
        let (x1, y1, x2, y2) = match (lhs, rhs) {
            (Point::Infinity, _) => return Ok(rhs.clone()),
            (_, Point::Infinity) => return Ok(lhs.clone()),
            (Point::Affine { x: x1, y: y1 }, Point::Affine { x: x2, y: y2 }) => (x1, y1, x2, y2),
        };
        let p = &self.p;

        if x1 == x2 {
            // P + P doubles, P + (-P) is the neutral element
            return if y1 == y2 { self.double(lhs) } else { Ok(Point::Infinity) };
        }

        let lambda = y2.mod_sub(y1, p)?.mod_mul(&x2.mod_sub(x1, p)?.mod_inverse(p)?, p)?;
        let x3 = lambda.mod_mul(&lambda, p)?.mod_sub(x1, p)?.mod_sub(x2, p)?;
        let y3 = lambda.mod_mul(&x1.mod_sub(&x3, p)?, p)?.mod_sub(y1, p)?;
        Ok(Point::Affine { x: x3, y: y3 })
    }

    pub fn double(&self, point: &Point) -> Result<Point, Error> {
        let Point::Affine { x, y } = point else {
            return Ok(Point::Infinity);
        };
        if y.is_zero() {
            return Ok(Point::Infinity);
        }
        let p = &self.p;

        let three_x2 = x.mod_mul(x, p)?.mod_mul(&BigInteger::from(3u32), p)?;
        let numerator = three_x2.mod_add(&self.a, p)?;
        let denominator = y.mod_add(y, p)?.mod_inverse(p)?;
        let lambda = numerator.mod_mul(&denominator, p)?;

        let x3 = lambda.mod_mul(&lambda, p)?.mod_sub(&x.mod_add(x, p)?, p)?;
        let y3 = lambda.mod_mul(&x.mod_sub(&x3, p)?, p)?.mod_sub(y, p)?;
        Ok(Point::Affine { x: x3, y: y3 })
    }

    /// Scalar multiplication with a Montgomery ladder.
    ///
    /// The ladder walks a fixed number of bits (the bit length of the group
    /// order) and performs one addition and one doubling per bit whatever its
    /// value. Scalars wider than the order are reduced first.
    pub fn mul(&self, scalar: &BigInteger, point: &Point) -> Result<Point, Error> {
        let order_bits = self.n.bits();
        let reduced;
        let k = if scalar.bits() > order_bits {
            reduced = scalar.modulo(&self.n)?;
            &reduced
        } else {
            scalar
        };

        let mut r0 = Point::Infinity;
        let mut r1 = point.clone();
        for i in (0..order_bits).rev() {
            if k.bit(i) {
                r0 = self.add(&r0, &r1)?;
                r1 = self.double(&r1)?;
            } else {
                r1 = self.add(&r0, &r1)?;
                r0 = self.double(&r0)?;
            }
        }
        Ok(r0)
    }

    /// `k * G`.
    pub fn mul_base(&self, scalar: &BigInteger) -> Result<Point, Error> {
        self.mul(scalar, &self.g)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ec::Curve;

    #[test]
    fn test_add_matches_double() {
        let params = Curve::P256.params();
        let g = &params.g;
        assert_eq!(params.add(g, g).unwrap(), params.double(g).unwrap());
    }

    #[test]
    fn test_scalar_multiplication_is_consistent() {
        let params = Curve::P384.params();
        let g = &params.g;
        let three_g = params.add(&params.double(g).unwrap(), g).unwrap();
        assert_eq!(params.mul_base(&BigInteger::from(3u32)).unwrap(), three_g);
        assert!(params.contains(&three_g));

        let a = BigInteger::from(123_456u32);
        let b = BigInteger::from(987_654u32);
        let ab = params.mul_base(&a.mul(&b)).unwrap();
        let ba = params.mul(&a, &params.mul_base(&b).unwrap()).unwrap();
        assert_eq!(ab, ba);
    }

    #[test]
    fn test_infinity_is_neutral() {
        let params = Curve::P256.params();
        let g = &params.g;
        assert_eq!(params.add(&Point::Infinity, g).unwrap(), *g);
        assert_eq!(params.add(g, &Point::Infinity).unwrap(), *g);
        assert_eq!(params.mul_base(&BigInteger::zero()).unwrap(), Point::Infinity);
    }

    #[test]
    fn test_point_rejects_off_curve_coordinates() {
        let params = Curve::P256.params();
        let gx = params.g.x().unwrap().clone();
        let gy = params.g.y().unwrap().add(&BigInteger::one());
        assert!(matches!(params.point(gx, gy), Err(Error::InvalidKey(_))));
        assert!(!params.contains(&Point::Infinity));
    }

    #[test]
    fn test_point_rejects_unreduced_coordinates() {
        let params = Curve::P256.params();
        let x = params.g.x().unwrap().add(&params.p);
        let y = params.g.y().unwrap().clone();
        assert!(params.point(x, y).is_err());
    }
}
