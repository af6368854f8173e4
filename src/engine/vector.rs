//! Small fixed-size vectors the solver is generic over.

use std::fmt::Debug;
use std::ops::{Add, AddAssign, Mul, MulAssign, Neg, Sub, SubAssign};

use rand::Rng;

/// Coordinates shared by the 2D and 3D layouts.
///
/// The first two components are the "planar" ones: pointer events and
/// picking only ever look at those, a third axis rides along untouched.
pub trait Vector:
	Copy
	+ Debug
	+ Default
	+ PartialEq
	+ Add<Output = Self>
	+ Sub<Output = Self>
	+ Mul<f64, Output = Self>
	+ Neg<Output = Self>
	+ AddAssign
	+ SubAssign
	+ MulAssign<f64>
{
	/// Number of components.
	const DIM: usize;

	/// The all-zero vector.
	fn zero() -> Self {
		Self::default()
	}

	/// Dot product.
	fn dot(self, other: Self) -> f64;

	/// Squared length, without the root.
	fn length_squared(self) -> f64 {
		self.dot(self)
	}

	/// Euclidean length.
	fn length(self) -> f64 {
		self.length_squared().sqrt()
	}

	/// Center-force target for a viewport of the given size.
	fn viewport_center(width: f64, height: f64) -> Self;

	/// Uniform sample in `[-half, half)` on every axis.
	fn jitter<R: Rng + ?Sized>(rng: &mut R, half: f64) -> Self;

	/// The `(x, y)` pair used for hit-testing.
	fn planar(self) -> (f64, f64);

	/// Copy of `self` with the planar components replaced.
	fn with_planar(self, x: f64, y: f64) -> Self;
}

fn sample<R: Rng + ?Sized>(rng: &mut R, half: f64) -> f64 {
	if half > 0.0 {
		rng.random_range(-half..half)
	} else {
		0.0
	}
}

/// Position or velocity on the canvas plane.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vec2 {
	/// Horizontal.
	pub x: f64,
	/// Vertical.
	pub y: f64,
}

impl Vec2 {
	/// Vector from its components.
	pub const fn new(x: f64, y: f64) -> Self {
		Self { x, y }
	}
}

/// Position or velocity in the orbit view, origin-centered.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vec3 {
	/// Horizontal.
	pub x: f64,
	/// Vertical.
	pub y: f64,
	/// Depth.
	pub z: f64,
}

impl Vec3 {
	/// Vector from its components.
	pub const fn new(x: f64, y: f64, z: f64) -> Self {
		Self { x, y, z }
	}
}

impl Vector for Vec2 {
	const DIM: usize = 2;

	fn dot(self, other: Self) -> f64 {
		self.x * other.x + self.y * other.y
	}

	fn viewport_center(width: f64, height: f64) -> Self {
		Self::new(width / 2.0, height / 2.0)
	}

	fn jitter<R: Rng + ?Sized>(rng: &mut R, half: f64) -> Self {
		Self::new(sample(rng, half), sample(rng, half))
	}

	fn planar(self) -> (f64, f64) {
		(self.x, self.y)
	}

	fn with_planar(self, x: f64, y: f64) -> Self {
		Self::new(x, y)
	}
}

impl Vector for Vec3 {
	const DIM: usize = 3;

	fn dot(self, other: Self) -> f64 {
		self.x * other.x + self.y * other.y + self.z * other.z
	}

	// The 3D scene is always centered on the origin, whatever the surface size.
	fn viewport_center(_width: f64, _height: f64) -> Self {
		Self::zero()
	}

	fn jitter<R: Rng + ?Sized>(rng: &mut R, half: f64) -> Self {
		Self::new(sample(rng, half), sample(rng, half), sample(rng, half))
	}

	fn planar(self) -> (f64, f64) {
		(self.x, self.y)
	}

	fn with_planar(self, x: f64, y: f64) -> Self {
		Self::new(x, y, self.z)
	}
}

macro_rules! impl_ops {
	($ty:ident { $($field:ident),+ }) => {
		impl Add for $ty {
			type Output = Self;
			fn add(self, rhs: Self) -> Self {
				Self { $($field: self.$field + rhs.$field),+ }
			}
		}

		impl Sub for $ty {
			type Output = Self;
			fn sub(self, rhs: Self) -> Self {
				Self { $($field: self.$field - rhs.$field),+ }
			}
		}

		impl Mul<f64> for $ty {
			type Output = Self;
			fn mul(self, rhs: f64) -> Self {
				Self { $($field: self.$field * rhs),+ }
			}
		}

		impl Neg for $ty {
			type Output = Self;
			fn neg(self) -> Self {
				Self { $($field: -self.$field),+ }
			}
		}

		impl AddAssign for $ty {
			fn add_assign(&mut self, rhs: Self) {
				$(self.$field += rhs.$field;)+
			}
		}

		impl SubAssign for $ty {
			fn sub_assign(&mut self, rhs: Self) {
				$(self.$field -= rhs.$field;)+
			}
		}

		impl MulAssign<f64> for $ty {
			fn mul_assign(&mut self, rhs: f64) {
				$(self.$field *= rhs;)+
			}
		}
	};
}

impl_ops!(Vec2 { x, y });
impl_ops!(Vec3 { x, y, z });
