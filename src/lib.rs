//! Personal-loan amortisation engine: given a principal, fee and interest
//! policy, a scheduled-payment plan and a history of actual payments,
//! produce a day-by-day schedule apportioning every movement to principal,
//! fees, interest and charges, and derive settlement quotes, reschedules
//! and rollovers from it.

pub mod error;
pub mod schedule;

pub mod money {
    pub mod amount;
    pub mod cent;
    pub mod decimal_cent;
    pub mod percent;
    pub mod rounding;
}

pub mod calendar {
    pub mod date_range;
    pub mod date_util;
    pub mod offset;
}

pub mod unit_period {
    pub mod config;
}

pub mod interest {
    pub mod accrual;
    pub mod config;
}

pub mod fees {
    pub mod charge;
    pub mod config;
}

pub mod schedule_gen {
    pub mod generator;
    pub mod scheduled_payment;
}

pub mod applied_payment {
    pub mod actual_payment;
    pub mod applied_payment;
    pub mod builder;
}

pub mod engine {
    pub mod accumulator;
    pub mod amortise;
    pub mod schedule_item;
}

pub mod apr {
    pub mod method;
    pub mod solver;
}

pub mod quote {
    pub mod params;
    pub mod quote;
    pub mod reschedule;
    pub mod rollover;
}
