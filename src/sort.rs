use sea_orm::{ColumnTrait, sea_query::Order};

use crate::errors::StoreError;
use crate::query::QueryParameters;

/// Convert the direction flag of the request to an `Order`
fn parse_order(descending: bool) -> Order {
    if descending { Order::Desc } else { Order::Asc }
}

/// Find column by name, ignoring ASCII case
fn find_column<C>(column_name: &str, columns: &[(&str, C)]) -> Option<C>
where
    C: ColumnTrait + Copy,
{
    columns
        .iter()
        .find(|&&(col_name, _)| col_name.eq_ignore_ascii_case(column_name))
        .map(|&(_, col)| col)
}

/// Resolve `orderBy` against the accepted field names.
///
/// An absent or empty `orderBy` sorts by `default_column` ascending.
///
/// # Errors
///
/// Returns [`StoreError::InvalidSortField`] when the field is not one of `columns`.
pub fn parse_sorting<C>(
    params: &QueryParameters,
    columns: &[(&str, C)],
    default_column: C,
) -> Result<(C, Order), StoreError>
where
    C: ColumnTrait + Copy,
{
    let Some(field) = params.order_field() else {
        return Ok((default_column, Order::Asc));
    };

    let column = find_column(field, columns).ok_or_else(|| StoreError::InvalidSortField {
        field: field.to_string(),
        allowed: columns
            .iter()
            .map(|(name, _)| *name)
            .collect::<Vec<_>>()
            .join(", "),
    })?;

    Ok((column, parse_order(params.is_descending())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::Composition;
    use crate::entity::composition::Column;
    use sea_orm::IdenStatic;

    fn order_by(value: &str) -> QueryParameters {
        QueryParameters {
            order_by: Some(value.to_string()),
            ..Default::default()
        }
    }

    fn sort(params: &QueryParameters) -> Result<(Column, Order), StoreError> {
        parse_sorting(params, &Composition::sortable_columns(), Column::Id)
    }

    #[test]
    fn test_default_sort_is_id_ascending() {
        let (column, order) = sort(&QueryParameters::default()).unwrap();
        assert_eq!(column.as_str(), Column::Id.as_str());
        assert_eq!(order, Order::Asc);

        let (column, _) = sort(&order_by("")).unwrap();
        assert_eq!(column.as_str(), Column::Id.as_str());
    }

    #[test]
    fn test_field_with_direction() {
        let (column, order) = sort(&order_by("calories desc")).unwrap();
        assert_eq!(column.as_str(), Column::Calories.as_str());
        assert_eq!(order, Order::Desc);

        let (column, order) = sort(&order_by("name")).unwrap();
        assert_eq!(column.as_str(), Column::Name.as_str());
        assert_eq!(order, Order::Asc);
    }

    #[test]
    fn test_field_names_are_case_insensitive() {
        let (column, _) = sort(&order_by("Calories")).unwrap();
        assert_eq!(column.as_str(), Column::Calories.as_str());

        let (column, _) = sort(&order_by("TYPE desc")).unwrap();
        assert_eq!(column.as_str(), Column::MealType.as_str());
    }

    #[test]
    fn test_unknown_field_is_rejected() {
        match sort(&order_by("colour desc")) {
            Err(StoreError::InvalidSortField { field, allowed }) => {
                assert_eq!(field, "colour");
                assert_eq!(allowed, "id, name, type, calories, created");
            }
            other => panic!("expected InvalidSortField, got {other:?}"),
        }
    }

    #[test]
    fn test_injection_attempt_is_rejected() {
        assert!(sort(&order_by("name; DROP TABLE compositions")).is_err());
    }
}
