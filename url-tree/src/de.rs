//! Deserialization of resolved [`Params`].
//!
//! The parameter set reads as a map keyed by variable name, or as a sequence in capture order.
//! A single parameter also reads as a scalar. Each value keeps the shape of its [`Param`]:
//! segments and converted values are text, while a pattern match reads as text (the whole
//! match), as a map of its named groups, or as a sequence of its numbered groups.

use std::{any::type_name, str::FromStr};

use serde::{
    de::{self, DeserializeSeed, Deserializer, Error as _, IntoDeserializer, Visitor},
    forward_to_deserialize_any,
};

use crate::params::{Param, Params};

type Error = de::value::Error;

macro_rules! forward_to {
    ($via:ident => $($method:ident)*) => {
        $(
            fn $method<V>(self, visitor: V) -> Result<V::Value, Self::Error>
            where
                V: Visitor<'de>,
            {
                self.$via()?.$method(visitor)
            }
        )*
    };
}

macro_rules! parse_text {
    ($($method:ident => $visit:ident,)*) => {
        $(
            fn $method<V>(self, visitor: V) -> Result<V::Value, Self::Error>
            where
                V: Visitor<'de>,
            {
                visitor.$visit(self.parse()?)
            }
        )*
    };
}

fn wrong_len(found: usize, expected: usize) -> Error {
    Error::custom(format!(
        "wrong number of parameters: {} expected {}",
        found, expected
    ))
}

/// Deserializer over resolved [`Params`], used by [`Params::load`].
#[derive(Debug)]
pub struct ParamsDeserializer<'de> {
    params: &'de Params,
}

impl<'de> ParamsDeserializer<'de> {
    pub fn new(params: &'de Params) -> Self {
        ParamsDeserializer { params }
    }

    /// The only parameter, for scalar targets.
    fn single(self) -> Result<ParamDeserializer<'de>, Error> {
        let mut iter = self.params.iter_params();

        match (iter.next(), iter.next()) {
            (Some((_, param)), None) => Ok(ParamDeserializer(param)),
            _ => Err(wrong_len(self.params.len(), 1)),
        }
    }
}

impl<'de> Deserializer<'de> for ParamsDeserializer<'de> {
    type Error = Error;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        self.deserialize_map(visitor)
    }

    fn deserialize_map<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        let entries = self
            .params
            .iter_params()
            .map(|(name, param)| (name, ParamDeserializer(param)));

        visitor.visit_map(Entries::new(entries))
    }

    fn deserialize_struct<V>(
        self,
        _: &'static str,
        _: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        self.deserialize_map(visitor)
    }

    fn deserialize_seq<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        let values = self
            .params
            .iter_params()
            .map(|(_, param)| ParamDeserializer(param));

        visitor.visit_seq(Elements(values))
    }

    fn deserialize_tuple<V>(self, len: usize, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        if self.params.len() < len {
            return Err(wrong_len(self.params.len(), len));
        }

        self.deserialize_seq(visitor)
    }

    fn deserialize_tuple_struct<V>(
        self,
        _: &'static str,
        len: usize,
        visitor: V,
    ) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        self.deserialize_tuple(len, visitor)
    }

    fn deserialize_option<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        if self.params.is_empty() {
            visitor.visit_none()
        } else {
            visitor.visit_some(self)
        }
    }

    fn deserialize_newtype_struct<V>(
        self,
        _: &'static str,
        visitor: V,
    ) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_enum<V>(
        self,
        name: &'static str,
        variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        self.single()?.deserialize_enum(name, variants, visitor)
    }

    fn deserialize_unit<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        visitor.visit_unit()
    }

    fn deserialize_unit_struct<V>(
        self,
        _: &'static str,
        visitor: V,
    ) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        visitor.visit_unit()
    }

    fn deserialize_ignored_any<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        visitor.visit_unit()
    }

    forward_to! {
        single =>
        deserialize_bool
        deserialize_i8 deserialize_i16 deserialize_i32 deserialize_i64
        deserialize_u8 deserialize_u16 deserialize_u32 deserialize_u64
        deserialize_f32 deserialize_f64
        deserialize_char deserialize_str deserialize_string
        deserialize_bytes deserialize_byte_buf deserialize_identifier
    }
}

/// One parameter value.
struct ParamDeserializer<'de>(&'de Param);

impl<'de> ParamDeserializer<'de> {
    fn text(self) -> Result<Text<'de>, Error> {
        Ok(Text(Some(self.0.as_str())))
    }
}

impl<'de> Deserializer<'de> for ParamDeserializer<'de> {
    type Error = Error;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        visitor.visit_borrowed_str(self.0.as_str())
    }

    fn deserialize_map<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        match self.0 {
            Param::Match(m) => {
                let groups = m.named().map(|(name, group)| (name, Text(group)));
                visitor.visit_map(Entries::new(groups))
            }
            _ => self.deserialize_any(visitor),
        }
    }

    fn deserialize_struct<V>(
        self,
        _: &'static str,
        _: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        self.deserialize_map(visitor)
    }

    fn deserialize_seq<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        match self.0 {
            Param::Match(m) => visitor.visit_seq(Elements(m.captures().map(Text))),
            _ => self.deserialize_any(visitor),
        }
    }

    fn deserialize_tuple<V>(self, len: usize, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        if let Param::Match(m) = self.0 {
            let found = m.captures().len();
            if found < len {
                return Err(Error::custom(format!(
                    "wrong number of capture groups: {} expected {}",
                    found, len
                )));
            }
        }

        self.deserialize_seq(visitor)
    }

    fn deserialize_tuple_struct<V>(
        self,
        _: &'static str,
        len: usize,
        visitor: V,
    ) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        self.deserialize_tuple(len, visitor)
    }

    fn deserialize_option<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        visitor.visit_some(self)
    }

    fn deserialize_newtype_struct<V>(
        self,
        _: &'static str,
        visitor: V,
    ) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_enum<V>(
        self,
        name: &'static str,
        variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        self.text()?.deserialize_enum(name, variants, visitor)
    }

    fn deserialize_unit_struct<V>(
        self,
        name: &'static str,
        visitor: V,
    ) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        self.text()?.deserialize_unit_struct(name, visitor)
    }

    forward_to! {
        text =>
        deserialize_bool
        deserialize_i8 deserialize_i16 deserialize_i32 deserialize_i64
        deserialize_u8 deserialize_u16 deserialize_u32 deserialize_u64
        deserialize_f32 deserialize_f64
        deserialize_char deserialize_str deserialize_string
        deserialize_bytes deserialize_byte_buf deserialize_identifier
        deserialize_unit deserialize_ignored_any
    }
}

/// Plain text value. `None` is a capture group that took no part in the match.
#[derive(Clone, Copy)]
struct Text<'de>(Option<&'de str>);

impl<'de> Text<'de> {
    fn value(self) -> Result<&'de str, Error> {
        match self.0 {
            Some(value) => Ok(value),
            None => Err(Error::custom("capture group did not participate in the match")),
        }
    }

    fn parse<F: FromStr>(self) -> Result<F, Error> {
        let value = self.value()?;

        value.parse().map_err(|_| {
            let target = type_name::<F>();
            Error::custom(format!("can not parse {:?} to a {}", value, target))
        })
    }
}

impl<'de> Deserializer<'de> for Text<'de> {
    type Error = Error;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        match self.0 {
            Some(value) => visitor.visit_borrowed_str(value),
            None => visitor.visit_none(),
        }
    }

    fn deserialize_option<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        match self.0 {
            Some(_) => visitor.visit_some(self),
            None => visitor.visit_none(),
        }
    }

    fn deserialize_bytes<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        visitor.visit_borrowed_bytes(self.value()?.as_bytes())
    }

    fn deserialize_byte_buf<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        self.deserialize_bytes(visitor)
    }

    fn deserialize_newtype_struct<V>(
        self,
        _: &'static str,
        visitor: V,
    ) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_enum<V>(
        self,
        _: &'static str,
        _: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        let variant: de::value::StrDeserializer<'_, Error> = self.value()?.into_deserializer();
        visitor.visit_enum(variant)
    }

    parse_text! {
        deserialize_bool => visit_bool,
        deserialize_i8 => visit_i8,
        deserialize_i16 => visit_i16,
        deserialize_i32 => visit_i32,
        deserialize_i64 => visit_i64,
        deserialize_u8 => visit_u8,
        deserialize_u16 => visit_u16,
        deserialize_u32 => visit_u32,
        deserialize_u64 => visit_u64,
        deserialize_f32 => visit_f32,
        deserialize_f64 => visit_f64,
        deserialize_char => visit_char,
    }

    forward_to_deserialize_any! {
        str string identifier unit unit_struct seq tuple tuple_struct map struct ignored_any
    }
}

/// Map access over `(name, value)` pairs.
struct Entries<I, D> {
    iter: I,
    value: Option<D>,
}

impl<I, D> Entries<I, D> {
    fn new(iter: I) -> Self {
        Entries { iter, value: None }
    }
}

impl<'de, I, D> de::MapAccess<'de> for Entries<I, D>
where
    I: Iterator<Item = (&'de str, D)>,
    D: Deserializer<'de, Error = Error>,
{
    type Error = Error;

    fn next_key_seed<K>(&mut self, seed: K) -> Result<Option<K::Value>, Self::Error>
    where
        K: DeserializeSeed<'de>,
    {
        match self.iter.next() {
            Some((name, value)) => {
                self.value = Some(value);
                seed.deserialize(Text(Some(name))).map(Some)
            }
            None => Ok(None),
        }
    }

    fn next_value_seed<S>(&mut self, seed: S) -> Result<S::Value, Self::Error>
    where
        S: DeserializeSeed<'de>,
    {
        let value = self
            .value
            .take()
            .ok_or_else(|| Error::custom("value requested before its key"))?;

        seed.deserialize(value)
    }

    fn size_hint(&self) -> Option<usize> {
        match self.iter.size_hint() {
            (lower, Some(upper)) if lower == upper => Some(upper),
            _ => None,
        }
    }
}

/// Sequence access over values.
struct Elements<I>(I);

impl<'de, I, D> de::SeqAccess<'de> for Elements<I>
where
    I: Iterator<Item = D>,
    D: Deserializer<'de, Error = Error>,
{
    type Error = Error;

    fn next_element_seed<S>(&mut self, seed: S) -> Result<Option<S::Value>, Self::Error>
    where
        S: DeserializeSeed<'de>,
    {
        self.0.next().map(|value| seed.deserialize(value)).transpose()
    }

    fn size_hint(&self) -> Option<usize> {
        match self.0.size_hint() {
            (lower, Some(upper)) if lower == upper => Some(upper),
            _ => None,
        }
    }
}
