// SPDX-License-Identifier: MIT OR Apache-2.0

//! Column (wire) type tags used to scope type handlers.

keyword_enum! {
    /// The column type a value is read from or written to.
    ///
    /// # Examples
    ///
    /// ```
    /// use mapcfg::domain::ColumnType;
    ///
    /// let tag: ColumnType = "VARCHAR".parse().unwrap();
    /// assert_eq!(tag, ColumnType::Varchar);
    /// assert!("varchar".parse::<ColumnType>().is_err());
    /// ```
    pub enum ColumnType {
        Array => "ARRAY",
        Bit => "BIT",
        TinyInt => "TINYINT",
        SmallInt => "SMALLINT",
        Integer => "INTEGER",
        BigInt => "BIGINT",
        Float => "FLOAT",
        Real => "REAL",
        Double => "DOUBLE",
        Numeric => "NUMERIC",
        Decimal => "DECIMAL",
        Char => "CHAR",
        Varchar => "VARCHAR",
        LongVarchar => "LONGVARCHAR",
        Date => "DATE",
        Time => "TIME",
        Timestamp => "TIMESTAMP",
        Binary => "BINARY",
        VarBinary => "VARBINARY",
        LongVarBinary => "LONGVARBINARY",
        Null => "NULL",
        Other => "OTHER",
        Blob => "BLOB",
        Clob => "CLOB",
        Boolean => "BOOLEAN",
        Cursor => "CURSOR",
        Undefined => "UNDEFINED",
        NVarchar => "NVARCHAR",
        NChar => "NCHAR",
        NClob => "NCLOB",
        Struct => "STRUCT",
        Distinct => "DISTINCT",
        Ref => "REF",
        RowId => "ROWID",
        LongNVarchar => "LONGNVARCHAR",
        SqlXml => "SQLXML",
        DateTimeOffset => "DATETIMEOFFSET",
        Json => "JSON",
    }
}
