mod appointment_test;
mod availability_test;
mod schedule_test;
