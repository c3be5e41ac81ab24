pub mod d400_profit_summary;
