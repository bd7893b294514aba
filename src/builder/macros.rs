//! Macros for ergonomic event and action arguments.

/// Build a `Vec<Value>` of extra arguments from anything convertible into a
/// JSON value.
///
/// # Example
///
/// ```
/// use statewise::{args, Value};
///
/// let credentials: Vec<Value> = args!["admin", "password"];
/// assert_eq!(credentials.len(), 2);
/// assert_eq!(credentials[0], Value::from("admin"));
///
/// let none: Vec<Value> = args![];
/// assert!(none.is_empty());
/// ```
#[macro_export]
macro_rules! args {
    () => {
        ::std::vec::Vec::<$crate::Value>::new()
    };
    ($($arg:expr),+ $(,)?) => {
        ::std::vec![$($crate::Value::from($arg)),+]
    };
}

#[cfg(test)]
mod tests {
    use crate::Value;

    #[test]
    fn args_converts_mixed_values() {
        let values = args!["login", 3, true, 1.5];
        assert_eq!(
            values,
            vec![
                Value::from("login"),
                Value::from(3),
                Value::from(true),
                Value::from(1.5)
            ]
        );
    }

    #[test]
    fn args_accepts_trailing_comma_and_owned_strings() {
        let owner = String::from("admin");
        let values = args![owner, "password",];
        assert_eq!(values[0].as_str(), Some("admin"));
        assert_eq!(values.len(), 2);
    }

    #[test]
    fn empty_args_is_empty() {
        assert!(args![].is_empty());
    }
}
