/// IEEE 754 half precision bits to f32
pub(crate) fn f16_to_f32(half: u16) -> f32 {
    let sign = ((half >> 15) & 1) as u32;
    let exponent = ((half >> 10) & 0x1f) as u32;
    let mantissa = (half & 0x3ff) as u32;

    match exponent {
        0 if mantissa == 0 => f32::from_bits(sign << 31),
        0 => {
            // subnormal: renormalize into the f32 exponent range
            let mut e = 0i32;
            let mut m = mantissa;
            while (m & 0x400) == 0 {
                m <<= 1;
                e -= 1;
            }
            m &= 0x3ff;
            let exp = (127 - 15 + 1 + e) as u32;
            f32::from_bits((sign << 31) | (exp << 23) | (m << 13))
        }
        31 => f32::from_bits((sign << 31) | (0xff << 23) | (mantissa << 13)),
        _ => {
            let exp = (exponent as i32 - 15 + 127) as u32;
            f32::from_bits((sign << 31) | (exp << 23) | (mantissa << 13))
        }
    }
}
