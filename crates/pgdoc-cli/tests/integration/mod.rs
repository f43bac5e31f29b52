mod binary;
mod chunk_command;
mod config_command;
