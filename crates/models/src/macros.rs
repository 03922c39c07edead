/// Declare an entity kind: a struct embedding [`BaseModel`](crate::BaseModel) plus a fixed set
/// of typed attributes.
///
/// Declared attributes start unset and read as their type's default; only assigned ones
/// appear in records and representations. Unknown names assigned through `set_field` land in
/// the base component's extra attributes.
macro_rules! entity_kind {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $field:ident : $ty:ty ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq)]
        pub struct $name {
            base: $crate::base_model::BaseModel,
            $( $field: Option<$ty>, )*
        }

        impl $name {
            pub const CLASS_NAME: &'static str = stringify!($name);

            pub const ATTRIBUTES: &'static [(&'static str, $crate::attr::AttrType)] = &[
                $( (stringify!($field), <$ty as $crate::attr::FieldValue>::ATTR_TYPE), )*
            ];

            /// Fresh instance with a new identity.
            pub fn new() -> Self {
                Self::with_base($crate::base_model::BaseModel::new())
            }

            pub fn with_base(base: $crate::base_model::BaseModel) -> Self {
                Self {
                    base,
                    $( $field: None, )*
                }
            }

            pub fn base(&self) -> &$crate::base_model::BaseModel {
                &self.base
            }

            pub fn base_mut(&mut self) -> &mut $crate::base_model::BaseModel {
                &mut self.base
            }

            $(
                pub fn $field(&self) -> $ty {
                    self.$field.clone().unwrap_or_default()
                }
            )*

            /// Assign an attribute by name, converting declared ones to their type.
            pub fn set_field(
                &mut self,
                name: &str,
                value: ::serde_json::Value,
            ) -> ::hbnb_core::DomainResult<()> {
                match name {
                    $(
                        stringify!($field) => {
                            self.$field =
                                Some(<$ty as $crate::attr::FieldValue>::from_value(&value)?);
                        }
                    )*
                    _ => self.base.set_extra(name, value),
                }
                Ok(())
            }

            /// Declared attributes that have been assigned, in declaration order.
            pub fn declared_values(&self) -> Vec<(&'static str, ::serde_json::Value)> {
                #[allow(unused_mut)]
                let mut out = Vec::new();
                $(
                    if let Some(v) = &self.$field {
                        out.push((
                            stringify!($field),
                            $crate::attr::FieldValue::to_value(v),
                        ));
                    }
                )*
                out
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl ::hbnb_core::Entity for $name {
            fn class_name(&self) -> &'static str {
                Self::CLASS_NAME
            }

            fn id(&self) -> &::hbnb_core::EntityId {
                self.base.id()
            }

            fn created_at(&self) -> ::chrono::DateTime<::chrono::Utc> {
                self.base.created_at()
            }

            fn updated_at(&self) -> ::chrono::DateTime<::chrono::Utc> {
                self.base.updated_at()
            }
        }
    };
}
