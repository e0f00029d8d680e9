use regex::Regex;
use std::fmt;
use std::sync::OnceLock;

/// Extracts every decimal number from a DICOM multi-valued string
///
/// Values are usually separated by backslashes, but any non-numeric
/// separator is accepted.
pub(crate) fn parse_decimals(s: &str) -> Vec<f64> {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    let re = REGEX.get_or_init(|| {
        Regex::new(r"[-+]?\d*\.?\d+(?:[eE][-+]?\d+)?").expect("Failed to compile regex")
    });

    re.find_iter(s)
        .filter_map(|m| m.as_str().parse::<f64>().ok())
        .collect()
}

/// A vector in the patient coordinate system (millimeters)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub struct Vector3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vector3 {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn dot(&self, other: &Vector3) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    pub fn cross(&self, other: &Vector3) -> Vector3 {
        Vector3 {
            x: self.y * other.z - self.z * other.y,
            y: self.z * other.x - self.x * other.z,
            z: self.x * other.y - self.y * other.x,
        }
    }

    /// Parses ImagePositionPatient-style triplets such as "-125.0\\-125.0\\42.5"
    ///
    /// # Errors
    ///
    /// Returns an error unless exactly three numbers are present
    pub fn parse(s: &str) -> Result<Self, String> {
        match parse_decimals(s).as_slice() {
            [x, y, z] => Ok(Vector3::new(*x, *y, *z)),
            other => Err(format!(
                "Expected 3 values for a position, got {} in '{}'",
                other.len(),
                s
            )),
        }
    }
}

impl fmt::Display for Vector3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

/// Image orientation (patient): direction cosines of the first row and
/// the first column of an image, as stored in (0020,0037)
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub struct ImageOrientation {
    pub row: Vector3,
    pub column: Vector3,
}

impl ImageOrientation {
    pub fn new(row: Vector3, column: Vector3) -> Self {
        Self { row, column }
    }

    /// Parses the six direction cosines of ImageOrientationPatient
    ///
    /// # Errors
    ///
    /// Returns an error unless exactly six numbers are present
    pub fn parse(s: &str) -> Result<Self, String> {
        match parse_decimals(s).as_slice() {
            [rx, ry, rz, cx, cy, cz] => Ok(ImageOrientation {
                row: Vector3::new(*rx, *ry, *rz),
                column: Vector3::new(*cx, *cy, *cz),
            }),
            other => Err(format!(
                "Expected 6 direction cosines, got {} in '{}'",
                other.len(),
                s
            )),
        }
    }

    /// Slice normal: row direction x column direction
    ///
    /// Not normalized; the orientation cosines are unit vectors already
    /// and only the relative order of projections matters.
    pub fn normal(&self) -> Vector3 {
        self.row.cross(&self.column)
    }
}

impl fmt::Display for ImageOrientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}\\{}\\{}\\{}\\{}\\{}",
            self.row.x, self.row.y, self.row.z, self.column.x, self.column.y, self.column.z
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_decimals_backslash() {
        assert_eq!(
            parse_decimals("1\\0\\0\\0\\1\\0"),
            vec![1.0, 0.0, 0.0, 0.0, 1.0, 0.0]
        );
    }

    #[test]
    fn test_parse_decimals_signs_and_exponents() {
        assert_eq!(parse_decimals("-1.5\\+2\\3e-1"), vec![-1.5, 2.0, 0.3]);
    }

    #[test]
    fn test_axial_normal() {
        let orientation = ImageOrientation::parse("1\\0\\0\\0\\1\\0").unwrap();
        assert_eq!(orientation.normal(), Vector3::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn test_coronal_normal() {
        let orientation = ImageOrientation::parse("1\\0\\0\\0\\0\\-1").unwrap();
        assert_eq!(orientation.normal(), Vector3::new(0.0, 1.0, 0.0));
    }

    #[test]
    fn test_orientation_wrong_count() {
        assert!(ImageOrientation::parse("1\\0\\0\\0\\1").is_err());
        assert!(ImageOrientation::parse("").is_err());
    }

    #[test]
    fn test_position_parse() {
        let pos = Vector3::parse("-125.5\\-130\\42.25").unwrap();
        assert_eq!(pos, Vector3::new(-125.5, -130.0, 42.25));
        assert!(Vector3::parse("1\\2").is_err());
    }

    #[test]
    fn test_dot() {
        let a = Vector3::new(1.0, 2.0, 3.0);
        let b = Vector3::new(4.0, -5.0, 6.0);
        assert_eq!(a.dot(&b), 12.0);
    }
}
