mod repair_dto;

pub use repair_dto::SaveRepairReportDto;
