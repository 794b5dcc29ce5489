//! Address table descriptor.

use super::sqlite::{text_or_null, SqliteRepository, SqliteTable};
use super::RepoResult;
use crate::model::address::{fields, Address, AddressChanges, NewAddress};
use rusqlite::types::Value;
use rusqlite::Row;

pub struct AddressTable;

pub type SqliteAddressRepository<'conn> = SqliteRepository<'conn, AddressTable>;

impl SqliteTable for AddressTable {
    type Entity = Address;
    type Draft = NewAddress;
    type Changes = AddressChanges;

    const TABLE: &'static str = "addresses";
    const COLUMNS: &'static [&'static str] = &[
        fields::ID,
        fields::CONTACT_ID,
        fields::STREET,
        fields::CITY,
        fields::PROVINCE,
        fields::COUNTRY,
        fields::POSTAL_CODE,
    ];
    const ORDER_BY: &'static str = fields::ID;

    fn parse_row(row: &Row<'_>) -> RepoResult<Address> {
        Ok(Address {
            id: row.get(0)?,
            contact_id: row.get(1)?,
            street: row.get(2)?,
            city: row.get(3)?,
            province: row.get(4)?,
            country: row.get(5)?,
            postal_code: row.get(6)?,
        })
    }

    fn draft_values(draft: &NewAddress) -> Vec<(&'static str, Value)> {
        vec![
            (fields::CONTACT_ID, Value::Integer(draft.contact_id)),
            (fields::STREET, text_or_null(draft.street.as_deref())),
            (fields::CITY, text_or_null(draft.city.as_deref())),
            (fields::PROVINCE, text_or_null(draft.province.as_deref())),
            (fields::COUNTRY, Value::Text(draft.country.clone())),
            (fields::POSTAL_CODE, Value::Text(draft.postal_code.clone())),
        ]
    }

    fn change_values(changes: &AddressChanges) -> Vec<(&'static str, Value)> {
        [
            (fields::STREET, &changes.street),
            (fields::CITY, &changes.city),
            (fields::PROVINCE, &changes.province),
            (fields::COUNTRY, &changes.country),
            (fields::POSTAL_CODE, &changes.postal_code),
        ]
        .into_iter()
        .filter_map(|(column, value)| {
            value
                .as_ref()
                .map(|text| (column, Value::Text(text.clone())))
        })
        .collect()
    }
}
