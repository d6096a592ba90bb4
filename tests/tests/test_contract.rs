// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

use graft_core::error::Error;
use graft_core::{
    DataConstructor, Graft, Object, ObjectData, ObjectDataContract, PropertyBag, Shared,
};
use graft_derive::GraftObject;

#[derive(GraftObject, Debug, PartialEq, Clone)]
struct Label {
    text: String,
}

#[derive(GraftObject, Debug, PartialEq)]
#[graft(contract)]
struct Money {
    cents: i64,
    currency: String,
    note: Option<Label>,
}

impl ObjectDataContract for Money {
    fn get_object_data(&self, data: &mut ObjectData) -> Result<(), Error> {
        data.add("units", self.cents / 100);
        data.add("fraction", (self.cents % 100) as i8);
        data.add("currency", self.currency.clone());
        match &self.note {
            Some(label) => data.add("note", label.clone()),
            None => data.add_null("note"),
        }
        Ok(())
    }

    fn data_constructor() -> Option<DataConstructor<Self>> {
        Some(|mut data| {
            let units: i64 = data.take("units")?;
            let fraction: i8 = data.take("fraction")?;
            Ok(Money {
                cents: units * 100 + fraction as i64,
                currency: data.take("currency")?,
                note: data.take_opt("note")?,
            })
        })
    }
}

#[derive(GraftObject)]
#[graft(contract)]
struct WriteOnly {
    value: i32,
}

impl ObjectDataContract for WriteOnly {
    fn get_object_data(&self, data: &mut ObjectData) -> Result<(), Error> {
        data.add("value", self.value);
        Ok(())
    }
}

#[derive(GraftObject)]
struct Wallet {
    owner: String,
    balance: Money,
}

#[derive(GraftObject)]
struct Holder {
    inner: WriteOnly,
}

#[test]
fn test_contract_round_trip() {
    let graft = Graft::default();
    let money = Money {
        cents: 12_345,
        currency: "EUR".to_string(),
        note: Some(Label {
            text: "rent".to_string(),
        }),
    };
    let bytes = graft.serialize(&money).unwrap();
    assert_eq!(graft.deserialize::<Money>(&bytes).unwrap(), money);

    let no_note = Money {
        cents: 5,
        currency: "USD".to_string(),
        note: None,
    };
    let bytes = graft.serialize(&no_note).unwrap();
    assert_eq!(graft.deserialize::<Money>(&bytes).unwrap(), no_note);

    let debt = Money {
        cents: -1_075,
        currency: "CHF".to_string(),
        note: None,
    };
    let bytes = graft.serialize(&debt).unwrap();
    assert_eq!(graft.deserialize::<Money>(&bytes).unwrap(), debt);
}

#[test]
fn test_contract_as_field() {
    let graft = Graft::default();
    let wallet = Wallet {
        owner: "kim".to_string(),
        balance: Money {
            cents: 100,
            currency: "JPY".to_string(),
            note: None,
        },
    };
    let bytes = graft.serialize(&wallet).unwrap();
    let back: Wallet = graft.deserialize(&bytes).unwrap();
    assert_eq!(back.owner, "kim");
    assert_eq!(back.balance, wallet.balance);
}

#[test]
fn test_contract_clone() {
    let graft = Graft::default();
    let money = Money {
        cents: -250,
        currency: "GBP".to_string(),
        note: None,
    };
    assert_eq!(graft.deep_clone(&money).unwrap(), money);
}

#[test]
fn test_missing_constructor() {
    let graft = Graft::default();
    assert!(matches!(
        graft.serialize(&WriteOnly { value: 1 }),
        Err(Error::MissingConstructor(_))
    ));
    assert!(matches!(
        graft.serialize(&Holder {
            inner: WriteOnly { value: 1 }
        }),
        Err(Error::MissingConstructor(_))
    ));
    assert!(matches!(
        graft.deep_clone(&WriteOnly { value: 1 }),
        Err(Error::MissingConstructor(_))
    ));
}

#[test]
fn test_object_data_take() {
    let mut data = ObjectData::new();
    data.add("n", 3i32);
    data.add_null("empty");
    assert_eq!(data.len(), 2);
    assert!(matches!(data.take::<i64>("n"), Err(Error::TypeMismatch(_))));
    assert!(matches!(data.take::<i32>("missing"), Err(Error::InvalidData(_))));
    assert!(matches!(data.take::<i32>("empty"), Err(Error::InvalidData(_))));
    assert_eq!(data.take_opt::<i32>("empty").unwrap(), None);
}

#[test]
fn test_property_bag() {
    let graft = Graft::default();
    let shared = Shared::new(vec![1i32, 2]);
    let mut bag = PropertyBag::new();
    bag.insert("count", 3i64);
    bag.insert("name", "bag".to_string());
    bag.insert_null("nothing");
    bag.insert(
        "label",
        Label {
            text: "inner".to_string(),
        },
    );
    bag.insert("first", shared.clone());
    bag.insert_object("second", Some(Box::new(shared)));

    let bytes = graft.serialize(&bag).unwrap();
    let back: PropertyBag = graft.deserialize(&bytes).unwrap();
    assert_eq!(
        back.keys().collect::<Vec<_>>(),
        vec!["count", "name", "nothing", "label", "first", "second"]
    );
    assert_eq!(back.get::<i64>("count"), Some(&3));
    assert_eq!(back.get::<String>("name").map(String::as_str), Some("bag"));
    assert!(matches!(back.get_object("nothing"), Some(None)));
    assert_eq!(back.get::<Label>("label").unwrap().text, "inner");
    let first = back.get::<Shared<Vec<i32>>>("first").unwrap();
    let second = back.get::<Shared<Vec<i32>>>("second").unwrap();
    assert!(Shared::ptr_eq(first, second));
    assert_eq!(*first.borrow(), vec![1, 2]);
}

#[test]
fn test_property_bag_as_any() {
    let graft = Graft::default();
    let mut bag = PropertyBag::new();
    bag.insert("pi", 3.5f32);
    let bytes = graft.serialize(&bag).unwrap();
    let object: Box<dyn Object> = graft.deserialize_any(&bytes).unwrap();
    let back = object.downcast::<PropertyBag>().unwrap();
    assert_eq!(back.get::<f32>("pi"), Some(&3.5));
}
