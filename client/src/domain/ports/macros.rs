//! `define_port_error!`: error enums for port boundaries.
//!
//! Each variant becomes a `thiserror` variant with the given message and
//! gains a snake_case constructor whose parameters accept `impl Into<T>`, so
//! adapters can write `AuthAuthorityError::timeout("5s elapsed")` without
//! building owned strings first.

macro_rules! define_port_error {
    (
        $(#[$outer:meta])*
        pub enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident $( { $($field:ident : $ty:ty),* $(,)? } )? => $message:literal
            ),* $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                #[error($message)]
                $variant $( { $($field: $ty),* } )?,
            )*
        }

        ::paste::paste! {
            impl $name {
                $(
                    #[doc = "Build the `" $variant "` variant."]
                    pub fn [<$variant:snake>]($( $($field: impl Into<$ty>),* )?) -> Self {
                        Self::$variant $( { $($field: $field.into()),* } )?
                    }
                )*
            }
        }
    };
}

pub(crate) use define_port_error;
