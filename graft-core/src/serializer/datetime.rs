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

use crate::error::Error;
use crate::resolver::context::{CloneContext, ReadContext, WriteContext};
use crate::serializer::{GraftDefault, Serializer};
use crate::types::Shape;
use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, Timelike, Utc};
use std::mem;
use std::time::Duration;

const NANOS_PER_SEC: i32 = 1_000_000_000;

macro_rules! impl_value_metadata {
    ($width:expr) => {
        #[inline(always)]
        fn graft_clone_data(&self, _: &mut CloneContext) -> Result<Self, Error> {
            Ok(*self)
        }

        #[inline(always)]
        fn graft_shape() -> Shape {
            Shape::Primitive
        }

        #[inline(always)]
        fn graft_reserved_space() -> usize {
            $width
        }
    };
}

fn read_timestamp(context: &mut ReadContext) -> Result<DateTime<Utc>, Error> {
    let secs = context.reader.read_i64()?;
    let nanos = context.reader.read_u32()?;
    DateTime::from_timestamp(secs, nanos)
        .ok_or_else(|| Error::invalid_data(format!("timestamp {}s {}ns out of range", secs, nanos)))
}

/// Days from 0001-01-01 as `i32`.
impl Serializer for NaiveDate {
    fn graft_write_data(&self, context: &mut WriteContext) -> Result<(), Error> {
        context.writer.write_i32(self.num_days_from_ce());
        Ok(())
    }

    fn graft_read_data(context: &mut ReadContext) -> Result<Self, Error> {
        let days = context.reader.read_i32()?;
        NaiveDate::from_num_days_from_ce_opt(days)
            .ok_or_else(|| Error::invalid_data(format!("date {} days from CE out of range", days)))
    }

    impl_value_metadata!(mem::size_of::<i32>());
}

impl GraftDefault for NaiveDate {
    fn graft_default() -> Self {
        NaiveDate::default()
    }
}

/// Seconds from midnight and nanoseconds, both `u32`.
impl Serializer for NaiveTime {
    fn graft_write_data(&self, context: &mut WriteContext) -> Result<(), Error> {
        context.writer.write_u32(self.num_seconds_from_midnight());
        context.writer.write_u32(self.nanosecond());
        Ok(())
    }

    fn graft_read_data(context: &mut ReadContext) -> Result<Self, Error> {
        let secs = context.reader.read_u32()?;
        let nanos = context.reader.read_u32()?;
        NaiveTime::from_num_seconds_from_midnight_opt(secs, nanos)
            .ok_or_else(|| Error::invalid_data(format!("time {}s {}ns out of range", secs, nanos)))
    }

    impl_value_metadata!(8);
}

impl GraftDefault for NaiveTime {
    fn graft_default() -> Self {
        NaiveTime::MIN
    }
}

/// Unix seconds as `i64` and nanoseconds as `u32`.
impl Serializer for NaiveDateTime {
    fn graft_write_data(&self, context: &mut WriteContext) -> Result<(), Error> {
        let utc = self.and_utc();
        context.writer.write_i64(utc.timestamp());
        context.writer.write_u32(utc.timestamp_subsec_nanos());
        Ok(())
    }

    fn graft_read_data(context: &mut ReadContext) -> Result<Self, Error> {
        Ok(read_timestamp(context)?.naive_utc())
    }

    impl_value_metadata!(12);
}

impl GraftDefault for NaiveDateTime {
    fn graft_default() -> Self {
        NaiveDateTime::default()
    }
}

impl Serializer for DateTime<Utc> {
    fn graft_write_data(&self, context: &mut WriteContext) -> Result<(), Error> {
        context.writer.write_i64(self.timestamp());
        context.writer.write_u32(self.timestamp_subsec_nanos());
        Ok(())
    }

    fn graft_read_data(context: &mut ReadContext) -> Result<Self, Error> {
        read_timestamp(context)
    }

    impl_value_metadata!(12);
}

impl GraftDefault for DateTime<Utc> {
    fn graft_default() -> Self {
        DateTime::<Utc>::default()
    }
}

/// Whole seconds as `i64` and the signed sub-second part as `i32`.
impl Serializer for TimeDelta {
    fn graft_write_data(&self, context: &mut WriteContext) -> Result<(), Error> {
        context.writer.write_i64(self.num_seconds());
        context.writer.write_i32(self.subsec_nanos());
        Ok(())
    }

    fn graft_read_data(context: &mut ReadContext) -> Result<Self, Error> {
        let secs = context.reader.read_i64()?;
        let nanos = context.reader.read_i32()?;
        if nanos <= -NANOS_PER_SEC || nanos >= NANOS_PER_SEC {
            return Err(Error::invalid_data(format!("duration nanos {} out of range", nanos)));
        }
        let delta = if nanos < 0 {
            secs.checked_sub(1)
                .and_then(|secs| TimeDelta::new(secs, (nanos + NANOS_PER_SEC) as u32))
        } else {
            TimeDelta::new(secs, nanos as u32)
        };
        delta.ok_or_else(|| Error::invalid_data(format!("duration {}s {}ns out of range", secs, nanos)))
    }

    impl_value_metadata!(12);
}

impl GraftDefault for TimeDelta {
    fn graft_default() -> Self {
        TimeDelta::zero()
    }
}

/// Seconds as `u64` and nanoseconds as `u32`.
impl Serializer for Duration {
    fn graft_write_data(&self, context: &mut WriteContext) -> Result<(), Error> {
        context.writer.write_u64(self.as_secs());
        context.writer.write_u32(self.subsec_nanos());
        Ok(())
    }

    fn graft_read_data(context: &mut ReadContext) -> Result<Self, Error> {
        let secs = context.reader.read_u64()?;
        let nanos = context.reader.read_u32()?;
        if nanos >= NANOS_PER_SEC as u32 {
            return Err(Error::invalid_data(format!("duration nanos {} out of range", nanos)));
        }
        Ok(Duration::new(secs, nanos))
    }

    impl_value_metadata!(12);
}

impl GraftDefault for Duration {
    fn graft_default() -> Self {
        Duration::ZERO
    }
}
