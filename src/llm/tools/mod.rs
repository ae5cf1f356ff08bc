pub mod research_tool;
