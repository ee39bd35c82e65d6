pub mod pay_period;

pub use pay_period::{PayPeriod, PayPeriodError, PayPeriodPair, ReferenceMonth};

/// Derive the owned `From<T>` impl for a type that already has `From<&T>`,
/// so entity-to-domain conversions work with both call shapes.
#[macro_export]
macro_rules! derive_from_reference {
    ($from_type:ty, $impl_type:ty) => {
        impl From<$from_type> for $impl_type {
            fn from(value: $from_type) -> Self {
                Self::from(&value)
            }
        }
    };
}

#[cfg(test)]
mod tests {
    struct OvertimeMinutes(u32);
    struct OvertimeHours(f64);

    impl From<&OvertimeMinutes> for OvertimeHours {
        fn from(value: &OvertimeMinutes) -> Self {
            OvertimeHours(f64::from(value.0) / 60.0)
        }
    }
    derive_from_reference!(OvertimeMinutes, OvertimeHours);

    #[test]
    fn test_owned_conversion_routes_through_the_reference_impl() {
        let hours: OvertimeHours = OvertimeMinutes(90).into();
        assert_eq!(hours.0, 1.5);
    }
}
