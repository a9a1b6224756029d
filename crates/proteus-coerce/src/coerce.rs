//! The coercion pass itself.

use crate::{CoercionError, RawParams, TypedParams, TypedValue};
use base64::Engine as _;
use chrono::{DateTime, NaiveDate};
use http::Method;
use proteus_contract::{Contract, ParamKind};

/// Coerces raw path captures against the contract snapshot.
///
/// Looks up the operation for `(template, method)` and converts each capture
/// per its declared kind:
///
/// - no operation for the route/verb pair → every capture passes through as
///   [`TypedValue::Raw`] ("the API doesn't know this route" is not an error);
/// - a capture with no matching `path` declaration, or a declaration without
///   type info, passes through as `Raw`;
/// - declared parameters that were never captured are skipped, never
///   invented;
/// - the first conversion failure aborts the whole call.
///
/// # Example
///
/// ```
/// use http::Method;
/// use proteus_coerce::{coerce_path_params, RawParams, TypedValue};
/// use proteus_contract::{Contract, Operation, ParamKind, ParameterDecl, Route};
///
/// let contract = Contract::builder("petstore")
///     .route(
///         Route::builder("/pets/{PetName}/photos/{ID}")
///             .operation(
///                 Operation::builder(Method::GET)
///                     .parameter(ParameterDecl::path("PetName").kind(ParamKind::String))
///                     .parameter(ParameterDecl::path("ID").kind(ParamKind::Integer))
///                     .build(),
///             )
///             .build(),
///     )
///     .build();
///
/// let mut raw = RawParams::new();
/// raw.push("PetName", "Fido");
/// raw.push("ID", "12345");
///
/// let typed = coerce_path_params(&contract, "/pets/{PetName}/photos/{ID}", &Method::GET, &raw)
///     .unwrap();
/// assert_eq!(typed.get("ID"), Some(&TypedValue::Integer(12345)));
/// ```
///
/// # Errors
///
/// Returns a [`CoercionError`] identifying the first parameter whose raw
/// value does not match its declared kind.
pub fn coerce_path_params(
    contract: &Contract,
    template: &str,
    method: &Method,
    raw: &RawParams,
) -> Result<TypedParams, CoercionError> {
    let Some(operation) = contract.operation(template, method) else {
        return Ok(pass_through(raw));
    };

    let mut typed = TypedParams::with_capacity(raw.len());
    for (name, value) in raw.iter() {
        let kind = operation
            .path_parameter(name)
            .and_then(proteus_contract::ParameterDecl::param_kind);
        match kind {
            Some(kind) => typed.push(name, coerce_value(name, value, kind)?),
            None => typed.push(name, TypedValue::Raw(value.to_string())),
        }
    }
    Ok(typed)
}

/// Pass-through conversion: every capture becomes a `Raw` value.
fn pass_through(raw: &RawParams) -> TypedParams {
    raw.iter()
        .map(|(name, value)| (name.to_string(), TypedValue::Raw(value.to_string())))
        .collect()
}

/// Converts one raw value per the kind table.
fn coerce_value(name: &str, raw: &str, kind: ParamKind) -> Result<TypedValue, CoercionError> {
    let fail = || CoercionError::new(name, raw, kind);
    match kind {
        ParamKind::String => Ok(TypedValue::String(raw.to_string())),
        ParamKind::Integer => raw
            .parse::<i64>()
            .map(TypedValue::Integer)
            .map_err(|_| fail()),
        ParamKind::Number => raw
            .parse::<f64>()
            .ok()
            .filter(|n| n.is_finite())
            .map(TypedValue::Number)
            .ok_or_else(fail),
        ParamKind::Boolean => match raw {
            "true" => Ok(TypedValue::Boolean(true)),
            "false" => Ok(TypedValue::Boolean(false)),
            _ => Err(fail()),
        },
        ParamKind::Date => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .map(TypedValue::Date)
            .map_err(|_| fail()),
        ParamKind::DateTime => DateTime::parse_from_rfc3339(raw)
            .map(TypedValue::DateTime)
            .map_err(|_| fail()),
        ParamKind::Byte => base64::engine::general_purpose::STANDARD
            .decode(raw)
            .map(TypedValue::Bytes)
            .map_err(|_| fail()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proteus_contract::{Operation, ParameterDecl, Route};

    fn typed_contract() -> Contract {
        Contract::builder("petstore")
            .route(
                Route::builder(
                    "/{intParam}/{floatParam}/{byteParam}/{dateParam}/{timeParam}/{boolParam}",
                )
                .operation(
                    Operation::builder(Method::GET)
                        .parameter(ParameterDecl::path("intParam").kind(ParamKind::Integer))
                        .parameter(ParameterDecl::path("floatParam").kind(ParamKind::Number))
                        .parameter(ParameterDecl::path("byteParam").kind(ParamKind::Byte))
                        .parameter(ParameterDecl::path("dateParam").kind(ParamKind::Date))
                        .parameter(ParameterDecl::path("timeParam").kind(ParamKind::DateTime))
                        .parameter(ParameterDecl::path("boolParam").kind(ParamKind::Boolean))
                        .build(),
                )
                .build(),
            )
            .route(
                Route::builder("/pets/{PetName}/photos/{ID}")
                    .operation(
                        Operation::builder(Method::GET)
                            .parameter(ParameterDecl::path("PetName").kind(ParamKind::String))
                            .parameter(ParameterDecl::path("ID").kind(ParamKind::Integer))
                            .build(),
                    )
                    .build(),
            )
            .build()
    }

    #[test]
    fn test_coerces_every_declared_kind() {
        let contract = typed_contract();
        let template = "/{intParam}/{floatParam}/{byteParam}/{dateParam}/{timeParam}/{boolParam}";

        let mut raw = RawParams::new();
        raw.push("intParam", "-951");
        raw.push("floatParam", "1576.179145671859");
        raw.push("byteParam", "aGVsbG8=");
        raw.push("dateParam", "2010-11-04");
        raw.push("timeParam", "1900-08-14T02:04:55.987-03:00");
        raw.push("boolParam", "true");

        let typed = coerce_path_params(&contract, template, &Method::GET, &raw).unwrap();

        assert_eq!(typed.get("intParam"), Some(&TypedValue::Integer(-951)));
        assert_eq!(
            typed.get("floatParam").and_then(TypedValue::as_f64),
            Some(1576.179_145_671_859)
        );
        assert_eq!(
            typed.get("byteParam").and_then(TypedValue::as_bytes),
            Some(b"hello".as_slice())
        );
        assert_eq!(
            typed.get("dateParam").and_then(TypedValue::as_date),
            NaiveDate::from_ymd_opt(2010, 11, 4)
        );
        assert!(typed.get("timeParam").and_then(TypedValue::as_datetime).is_some());
        assert_eq!(typed.get("boolParam"), Some(&TypedValue::Boolean(true)));
    }

    #[test]
    fn test_unknown_route_passes_through() {
        let contract = typed_contract();

        let mut raw = RawParams::new();
        raw.push("PetName", "Fido");
        raw.push("ID", "12345");

        let typed =
            coerce_path_params(&contract, "/unknown/{PetName}/{ID}", &Method::GET, &raw).unwrap();

        assert_eq!(typed.get("PetName"), Some(&TypedValue::Raw("Fido".to_string())));
        assert_eq!(typed.get("ID"), Some(&TypedValue::Raw("12345".to_string())));
    }

    #[test]
    fn test_unknown_verb_passes_through() {
        let contract = typed_contract();

        let mut raw = RawParams::new();
        raw.push("ID", "12345");

        let typed =
            coerce_path_params(&contract, "/pets/{PetName}/photos/{ID}", &Method::PUT, &raw)
                .unwrap();

        assert!(typed.get("ID").is_some_and(TypedValue::is_raw));
    }

    #[test]
    fn test_undeclared_capture_stays_raw() {
        let contract = Contract::builder("petstore")
            .route(
                Route::builder("/pets/{PetName}/photos/{ID}")
                    .operation(
                        Operation::builder(Method::GET)
                            .parameter(ParameterDecl::path("ID").kind(ParamKind::Integer))
                            .build(),
                    )
                    .build(),
            )
            .build();

        let mut raw = RawParams::new();
        raw.push("PetName", "Fido");
        raw.push("ID", "12345");

        let typed =
            coerce_path_params(&contract, "/pets/{PetName}/photos/{ID}", &Method::GET, &raw)
                .unwrap();

        // Declared capture is typed, the undeclared one crosses untouched.
        assert_eq!(typed.get("ID"), Some(&TypedValue::Integer(12345)));
        assert_eq!(typed.get("PetName"), Some(&TypedValue::Raw("Fido".to_string())));
    }

    #[test]
    fn test_declared_but_uncaptured_parameter_is_skipped() {
        let contract = typed_contract();

        let mut raw = RawParams::new();
        raw.push("PetName", "Fido");

        let typed =
            coerce_path_params(&contract, "/pets/{PetName}/photos/{ID}", &Method::GET, &raw)
                .unwrap();

        assert_eq!(typed.len(), 1);
        assert!(typed.get("ID").is_none());
    }

    #[test]
    fn test_fractional_integer_fails_with_whole_number_message() {
        let contract = typed_contract();

        let mut raw = RawParams::new();
        raw.push("PetName", "Fido");
        raw.push("ID", "52.5");

        let err = coerce_path_params(&contract, "/pets/{PetName}/photos/{ID}", &Method::GET, &raw)
            .unwrap_err();

        assert_eq!(err.name(), "ID");
        assert!(err
            .to_string()
            .contains("\"52.5\" is not a properly-formatted whole number"));
    }

    #[test]
    fn test_first_failure_aborts_whole_call() {
        let contract = typed_contract();
        let template = "/{intParam}/{floatParam}/{byteParam}/{dateParam}/{timeParam}/{boolParam}";

        let mut raw = RawParams::new();
        raw.push("intParam", "not-a-number");
        raw.push("boolParam", "also-bad");

        let err = coerce_path_params(&contract, template, &Method::GET, &raw).unwrap_err();

        // A single error for the first offender, nothing partially coerced.
        assert_eq!(err.name(), "intParam");
    }

    #[test]
    fn test_boolean_is_case_sensitive() {
        let contract = Contract::builder("t")
            .route(
                Route::builder("/flags/{flag}")
                    .operation(
                        Operation::builder(Method::GET)
                            .parameter(ParameterDecl::path("flag").kind(ParamKind::Boolean))
                            .build(),
                    )
                    .build(),
            )
            .build();

        let mut raw = RawParams::new();
        raw.push("flag", "True");

        let err = coerce_path_params(&contract, "/flags/{flag}", &Method::GET, &raw).unwrap_err();
        assert_eq!(err.expected(), "boolean");
    }

    #[test]
    fn test_number_rejects_non_finite_literals() {
        let contract = Contract::builder("t")
            .route(
                Route::builder("/n/{n}")
                    .operation(
                        Operation::builder(Method::GET)
                            .parameter(ParameterDecl::path("n").kind(ParamKind::Number))
                            .build(),
                    )
                    .build(),
            )
            .build();

        for bad in ["NaN", "inf", "-inf", "1.2.3", ""] {
            let mut raw = RawParams::new();
            raw.push("n", bad);
            assert!(
                coerce_path_params(&contract, "/n/{n}", &Method::GET, &raw).is_err(),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_declaration_without_type_info_stays_raw() {
        let contract = Contract::builder("t")
            .route(
                Route::builder("/pets/{PetName}")
                    .operation(
                        Operation::builder(Method::GET)
                            .parameter(ParameterDecl::path("PetName"))
                            .build(),
                    )
                    .build(),
            )
            .build();

        let mut raw = RawParams::new();
        raw.push("PetName", "Fido");

        let typed = coerce_path_params(&contract, "/pets/{PetName}", &Method::GET, &raw).unwrap();
        assert!(typed.get("PetName").is_some_and(TypedValue::is_raw));
    }

    mod round_trip {
        use super::*;
        use proptest::prelude::*;

        fn single_param_contract(kind: ParamKind) -> Contract {
            Contract::builder("round-trip")
                .route(
                    Route::builder("/values/{v}")
                        .operation(
                            Operation::builder(Method::GET)
                                .parameter(ParameterDecl::path("v").kind(kind))
                                .build(),
                        )
                        .build(),
                )
                .build()
        }

        fn coerce_one(contract: &Contract, raw_value: &str) -> TypedValue {
            let mut raw = RawParams::new();
            raw.push("v", raw_value);
            coerce_path_params(contract, "/values/{v}", &Method::GET, &raw)
                .expect("canonical form should re-coerce")
                .get("v")
                .expect("value should be present")
                .clone()
        }

        proptest! {
            #[test]
            fn prop_integer_round_trip(n in any::<i64>()) {
                let contract = single_param_contract(ParamKind::Integer);
                let typed = coerce_one(&contract, &n.to_string());
                prop_assert_eq!(coerce_one(&contract, &typed.canonical_string()), typed);
            }

            #[test]
            fn prop_number_round_trip(n in -1.0e300f64..1.0e300) {
                let contract = single_param_contract(ParamKind::Number);
                let typed = coerce_one(&contract, &n.to_string());
                prop_assert_eq!(coerce_one(&contract, &typed.canonical_string()), typed);
            }

            #[test]
            fn prop_boolean_round_trip(b in any::<bool>()) {
                let contract = single_param_contract(ParamKind::Boolean);
                let typed = coerce_one(&contract, &b.to_string());
                prop_assert_eq!(coerce_one(&contract, &typed.canonical_string()), typed);
            }

            #[test]
            fn prop_date_round_trip(year in 1970i32..2100, month in 1u32..=12, day in 1u32..=28) {
                let contract = single_param_contract(ParamKind::Date);
                let raw = format!("{year:04}-{month:02}-{day:02}");
                let typed = coerce_one(&contract, &raw);
                prop_assert_eq!(coerce_one(&contract, &typed.canonical_string()), typed);
            }
        }
    }
}
