//! Text rendering of tensors for triage
//!
//! Every line has the form `name = [v0, v1, ...]`. Values use Rust's `Display`,
//! so a float prints the shortest text that parses back to the same bits.

use {
    crate::{PredictionError, TensorBuffer},
    onnx::{ElementType, Value},
    std::fmt::{self, Display, Write},
};

/// `[a, b, c]`
pub fn write_list<W, I>(out: &mut W, items: I) -> fmt::Result
where
    W: Write + ?Sized,
    I: IntoIterator,
    I::Item: Display,
{
    out.write_char('[')?;
    for (i, item) in items.into_iter().enumerate() {
        if i > 0 {
            out.write_str(", ")?;
        }
        write!(out, "{}", item)?;
    }
    out.write_char(']')
}

/// `name = [..]` for generated input data
pub fn write_buffer<W: Write + ?Sized>(out: &mut W, name: &str, buffer: &TensorBuffer) -> fmt::Result {
    writeln!(out, "{} = {}", name, buffer)
}

/// Tensor contents by element type
///
/// Element types without a rendering, and non-tensor values, produce a bracketed
/// notice rather than an error.
pub fn write_value<W: Write + ?Sized>(out: &mut W, value: &Value) -> Result<(), PredictionError> {
    if !value.is_tensor()? {
        out.write_str("[non-tensor value]")?;
        return Ok(());
    }
    match value.element_type()? {
        ElementType::Float => write_list(out, value.extract_tensor::<f32>()?)?,
        ElementType::Float16 => write_list(out, value.extract_as_f32()?)?,
        ElementType::Double => write_list(out, value.extract_tensor::<f64>()?)?,
        ElementType::Int8 => write_list(out, value.extract_tensor::<i8>()?)?,
        ElementType::Int16 => write_list(out, value.extract_tensor::<i16>()?)?,
        ElementType::Int32 => write_list(out, value.extract_tensor::<i32>()?)?,
        ElementType::Int64 => write_list(out, value.extract_tensor::<i64>()?)?,
        ElementType::Uint8 => write_list(out, value.extract_tensor::<u8>()?)?,
        ElementType::Uint16 => write_list(out, value.extract_tensor::<u16>()?)?,
        ElementType::Uint32 => write_list(out, value.extract_tensor::<u32>()?)?,
        ElementType::Uint64 => write_list(out, value.extract_tensor::<u64>()?)?,
        ElementType::Bool => write_list(out, value.extract_bool()?)?,
        other => write!(out, "[unsupported element type {}]", other)?,
    }
    Ok(())
}

/// One `name = [..]` line per output, in declared order
pub fn write_outputs<W: Write + ?Sized>(
    out: &mut W,
    names: &[String],
    values: &[Option<Value>],
) -> Result<(), PredictionError> {
    for (name, value) in names.iter().zip(values) {
        write!(out, "{} = ", name)?;
        match value {
            Some(value) => write_value(out, value)?,
            None => out.write_str("<unset>")?,
        }
        out.write_char('\n')?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_list() {
        let mut out = String::new();
        write_list(&mut out, [1, 2, 3]).unwrap();
        assert_eq!(out, "[1, 2, 3]");

        let mut out = String::new();
        write_list(&mut out, Vec::<f32>::new()).unwrap();
        assert_eq!(out, "[]");

        let mut out = String::new();
        write_list(&mut out, [true, false]).unwrap();
        assert_eq!(out, "[true, false]");
    }

    #[test]
    fn test_write_buffer() {
        let mut out = String::new();
        write_buffer(&mut out, "x", &TensorBuffer::Float(vec![1.5, -0.25])).unwrap();
        assert_eq!(out, "x = [1.5, -0.25]\n");
    }

    #[test]
    fn test_unset_outputs() {
        let mut out = String::new();
        write_outputs(&mut out, &["a".to_string(), "b".to_string()], &[None, None]).unwrap();
        assert_eq!(out, "a = <unset>\nb = <unset>\n");
    }
}
